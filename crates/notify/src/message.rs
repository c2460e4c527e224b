//! Message Formatting
//!
//! Renders a list of alerts of one lifecycle kind as a Telegram HTML message.

use alerting::{AlertRecord, PartitionKind};
use serde::Serialize;

/// Telegram parse mode for rendered messages
pub const PARSE_MODE_HTML: &str = "HTML";

const SEPARATOR: &str = "━━━━━━━━━━━━━━━";
const FOOTER: &str = "───────────────\n🤖 <i>Transit Alert Bot | Stay informed, travel smart</i>";

/// A rendered notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertMessage {
    pub text: String,
    pub parse_mode: &'static str,
}

impl AlertMessage {
    /// Render alerts of one kind. Returns `None` when there is nothing to send.
    pub fn from_alerts(kind: PartitionKind, alerts: &[AlertRecord]) -> Option<Self> {
        if alerts.is_empty() {
            return None;
        }

        let title = match kind {
            PartitionKind::New => "🚨 <b>NEW SERVICE ALERTS</b> 🚨",
            PartitionKind::Resolved => "✅ <b>RESOLVED ALERTS</b> ✅",
            PartitionKind::Unresolved => "⏳ <b>STILL ACTIVE</b> ⏳",
        };

        let entries: Vec<String> = alerts.iter().map(|alert| render_entry(kind, alert)).collect();
        let separator = format!("\n{}\n", SEPARATOR);

        let text = format!(
            "{}\n{}\n{}\n{}",
            title,
            SEPARATOR,
            entries.join(separator.as_str()),
            FOOTER
        );

        Some(Self {
            text,
            parse_mode: PARSE_MODE_HTML,
        })
    }
}

fn render_entry(kind: PartitionKind, alert: &AlertRecord) -> String {
    let icon = icon(alert.header());
    let header = escape_html(alert.header());
    let description = escape_html(alert.description());

    match kind {
        PartitionKind::Resolved => {
            format!("{} <s>{}</s> ✅\n📋 <i>{}</i>", icon, header, description)
        }
        PartitionKind::New | PartitionKind::Unresolved => {
            format!("{} <b>{}</b>\n📋 {}", icon, header, description)
        }
    }
}

/// Subway lines, bus/streetcar routes, and everything else
fn icon(header: &str) -> &'static str {
    if header.contains("Line") {
        "🚇"
    } else if header.contains("Bus") || header.starts_with(|c: char| c.is_ascii_digit()) {
        "🚌"
    } else {
        "⚠️"
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
