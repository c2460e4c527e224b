//! Monitor Error Types

use gtfs_feed::FeedError;
use thiserror::Error;

/// Errors from the poll loop and its configuration
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Fetch or decode failed
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// Timing values are out of range
    #[error("Invalid monitor configuration: {0}")]
    Config(String),
}
