//! Feed Error Types

use thiserror::Error;

/// Errors that can occur while fetching or decoding the feed
#[derive(Debug, Error)]
pub enum FeedError {
    /// Connection, DNS, or transfer failure
    #[error("Network error: {0}")]
    Network(String),

    /// Request did not complete in time
    #[error("Timeout fetching feed after {0}s")]
    Timeout(u64),

    /// Non-success HTTP status
    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    /// Malformed protocol buffer payload
    #[error("Failed to parse GTFS-RT data: {0}")]
    Parse(String),

    /// Client could not be built from configuration
    #[error("Invalid feed configuration: {0}")]
    Config(String),
}

impl FeedError {
    /// Transport-level failure (timeout, DNS, non-2xx)
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_) | Self::Http { .. })
    }

    /// Decode failure
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// Worth repeating the request immediately
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

impl From<prost::DecodeError> for FeedError {
    fn from(err: prost::DecodeError) -> Self {
        FeedError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert!(FeedError::Timeout(30).is_network());
        assert!(FeedError::Timeout(30).is_retryable());

        let http = FeedError::Http {
            status: 503,
            url: "http://feed".to_string(),
        };
        assert!(http.is_network());
        assert!(!http.is_retryable());

        assert!(FeedError::Parse("truncated".to_string()).is_parse());
        assert!(!FeedError::Parse("truncated".to_string()).is_network());
    }
}
