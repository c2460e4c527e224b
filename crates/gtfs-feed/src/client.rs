//! Feed Client
//!
//! Fetches the raw alerts payload over HTTP with a bounded timeout and a
//! small number of retries for transport failures.

use crate::error::FeedError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Feed client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// GTFS-RT alerts endpoint
    pub url: String,
    /// Request timeout (seconds)
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Extra attempts after a network failure or timeout
    pub max_retries: u8,
    /// Retry backoff base in milliseconds (multiplied by the attempt number)
    pub retry_backoff_ms: u64,
    /// Preferred translation language
    pub language: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: crate::DEFAULT_FEED_URL.to_string(),
            timeout_secs: 30,
            user_agent: format!("transit-alerts/{}", env!("CARGO_PKG_VERSION")),
            max_retries: 2,
            retry_backoff_ms: 500,
            language: crate::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// HTTP client for the alerts feed
pub struct FeedClient {
    config: FeedConfig,
    http: reqwest::Client,
}

impl FeedClient {
    /// Create a new feed client
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        info!("Creating feed client for {}", config.url);

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FeedError::Config(e.to_string()))?;

        Ok(Self { config, http })
    }

    /// Feed URL
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Fetch the raw payload, retrying transport failures
    pub async fn fetch(&self) -> Result<Vec<u8>, FeedError> {
        let mut attempt: u8 = 0;
        loop {
            match self.fetch_once().await {
                Ok(data) => return Ok(data),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let backoff = retry_backoff(self.config.retry_backoff_ms, attempt);
                    warn!(
                        "Feed fetch failed (attempt {}/{}): {}, retrying in {:?}",
                        attempt,
                        u16::from(self.config.max_retries) + 1,
                        e,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self) -> Result<Vec<u8>, FeedError> {
        debug!("Fetching {}", self.config.url);

        let response = self
            .http
            .get(&self.config.url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Http {
                status: status.as_u16(),
                url: self.config.url.clone(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        debug!("Fetched {} bytes", body.len());
        Ok(body.to_vec())
    }

    fn transport_error(&self, err: reqwest::Error) -> FeedError {
        if err.is_timeout() {
            FeedError::Timeout(self.config.timeout_secs)
        } else {
            FeedError::Network(err.to_string())
        }
    }
}

/// Linear backoff before retry number `attempt`
fn retry_backoff(base_ms: u64, attempt: u8) -> Duration {
    Duration::from_millis(base_ms.saturating_mul(u64::from(attempt)))
}
