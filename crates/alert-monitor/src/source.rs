//! Feed Sources

use async_trait::async_trait;
use gtfs_feed::{FeedClient, FeedError};

/// Something that yields the raw alerts payload
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the current payload
    async fn fetch(&self) -> Result<Vec<u8>, FeedError>;
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch(&self) -> Result<Vec<u8>, FeedError> {
        FeedClient::fetch(self).await
    }
}
