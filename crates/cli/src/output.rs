//! One-shot Output Formatting

use alerting::AlertRecord;
use chrono::{DateTime, Local, Utc};

const NOT_SPECIFIED: &str = "Not specified";

/// Render one alert as a multi-line block
pub fn format_alert(alert: &AlertRecord) -> String {
    let metadata = alert.metadata();
    let mut lines = vec![
        format!("Header: {}", alert.header()),
        format!("Description: {}", alert.description()),
    ];

    if let Some(url) = &metadata.url {
        lines.push(format!("URL: {}", url));
    }

    lines.push(format!("Cause: {}", metadata.cause));
    lines.push(format!("Effect: {}", metadata.effect));

    if !metadata.active_periods.is_empty() {
        lines.push("Active Periods:".to_string());
        for period in &metadata.active_periods {
            lines.push(format!(
                "  From: {} To: {}",
                timestamp(period.start),
                timestamp(period.end)
            ));
        }
    }

    let affected = metadata.affected();
    if !affected.is_empty() {
        lines.push(format!("Affected: {}", affected.join(", ")));
    }

    lines.join("\n")
}

/// Render the full one-shot report
pub fn format_report(alerts: &[AlertRecord], retrieved_at: DateTime<Local>) -> String {
    if alerts.is_empty() {
        return "No service alerts found".to_string();
    }

    let mut out = format!(
        "=== Service Alerts ({} found) ===\nRetrieved at: {}\n{}",
        alerts.len(),
        retrieved_at.format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(50)
    );
    for (i, alert) in alerts.iter().enumerate() {
        out.push_str(&format!("\n\nAlert {}:\n{}\n{}", i + 1, "-".repeat(30), format_alert(alert)));
    }
    out
}

/// Render alerts as a pretty JSON array
pub fn format_json(alerts: &[AlertRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(alerts)
}

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    match value {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => NOT_SPECIFIED.to_string(),
    }
}
