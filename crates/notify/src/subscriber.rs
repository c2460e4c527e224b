//! Subscribers

use alerting::AlertRecord;
use serde::{Deserialize, Serialize};

/// A notification recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub username: String,
    /// Destination id on the chat service
    pub chat_id: String,
    /// Keywords; when non-empty only matching alerts are delivered
    #[serde(default)]
    pub filters: Vec<String>,
}

impl Subscriber {
    /// Create a subscriber receiving every alert
    pub fn new(username: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            chat_id: chat_id.into(),
            filters: Vec::new(),
        }
    }

    /// Restrict delivery to alerts mentioning one of `filters`
    pub fn with_filters(mut self, filters: Vec<String>) -> Self {
        self.filters = filters;
        self
    }

    /// Case-insensitive keyword match against header and description
    pub fn matches(&self, alert: &AlertRecord) -> bool {
        if self.filters.is_empty() {
            return true;
        }

        let header = alert.header().to_lowercase();
        let description = alert.description().to_lowercase();
        self.filters.iter().any(|filter| {
            let filter = filter.to_lowercase();
            header.contains(&filter) || description.contains(&filter)
        })
    }

    /// Alerts this subscriber wants, in input order
    pub fn select(&self, alerts: &[AlertRecord]) -> Vec<AlertRecord> {
        alerts.iter().filter(|alert| self.matches(alert)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alerts() -> Vec<AlertRecord> {
        vec![
            AlertRecord::new("Line 1", "No service between St Clair and Union"),
            AlertRecord::new("501 Queen", "Diversion via King"),
            AlertRecord::new("Elevator", "Out of service at Kipling"),
        ]
    }

    #[test]
    fn test_no_filters_selects_all() {
        let subscriber = Subscriber::new("alice", "100");
        assert_eq!(subscriber.select(&alerts()).len(), 3);
    }

    #[test]
    fn test_filters_match_header_or_description() {
        let subscriber =
            Subscriber::new("bob", "200").with_filters(vec!["line 1".to_string(), "KIPLING".to_string()]);

        let selected = subscriber.select(&alerts());
        let headers: Vec<_> = selected.iter().map(AlertRecord::header).collect();
        assert_eq!(headers, vec!["Line 1", "Elevator"]);
    }

    #[test]
    fn test_filters_without_match() {
        let subscriber = Subscriber::new("carol", "300").with_filters(vec!["510".to_string()]);
        assert!(subscriber.select(&alerts()).is_empty());
    }
}
