//! Telegram Bot API notification channel.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ChannelError;
use crate::message::AlertMessage;
use crate::NotifyChannel;

/// Default Telegram Bot API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Telegram configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token; no token disables the channel
    pub bot_token: Option<String>,
    /// Bot API base URL
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseParameters {
    retry_after: Option<u64>,
}

/// Telegram `sendMessage` channel.
pub struct TelegramChannel {
    bot_token: Option<String>,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    /// Create a Telegram channel from configuration.
    pub fn from_config(config: &TelegramConfig) -> Self {
        if config.bot_token.is_some() {
            debug!("Telegram notifications enabled");
        } else {
            debug!("Telegram notifications disabled (no bot token)");
        }

        Self {
            bot_token: config.bot_token.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, token: &str) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, token)
    }
}

#[async_trait]
impl NotifyChannel for TelegramChannel {
    fn name(&self) -> &'static str {
        "telegram"
    }

    fn enabled(&self) -> bool {
        self.bot_token.is_some()
    }

    async fn send(&self, destination: &str, message: &AlertMessage) -> Result<(), ChannelError> {
        let token = self
            .bot_token
            .as_deref()
            .ok_or_else(|| ChannelError::NotConfigured("telegram bot token".to_string()))?;

        let request = SendMessageRequest {
            chat_id: destination,
            text: &message.text,
            parse_mode: message.parse_mode,
        };

        let response = self
            .client
            .post(self.endpoint(token))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(chat_id = destination, "Telegram message sent");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if status.as_u16() == 429 {
            let retry_after_secs = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|r| r.parameters)
                .and_then(|p| p.retry_after)
                .unwrap_or(0);
            warn!(chat_id = destination, retry_after_secs, "Telegram rate limit hit");
            return Err(ChannelError::RateLimited { retry_after_secs });
        }

        Err(ChannelError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerting::{AlertRecord, PartitionKind};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Answer one request with `status`/`body`, handing back the raw request.
    async fn serve_once(status: u16, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
        });

        (base, rx)
    }

    fn request_complete(request: &[u8]) -> bool {
        let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&request[..end]);
        let body = &request[end + 4..];
        let length = head
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        body.len() >= length
    }

    fn channel(base: String) -> TelegramChannel {
        TelegramChannel::from_config(&TelegramConfig {
            bot_token: Some("123:abc".to_string()),
            api_base: base,
        })
    }

    fn message() -> AlertMessage {
        AlertMessage::from_alerts(PartitionKind::New, &[AlertRecord::new("Line 1", "Delays")]).unwrap()
    }

    #[test]
    fn test_disabled_without_token() {
        let channel = TelegramChannel::from_config(&TelegramConfig::default());
        assert!(!channel.enabled());
        assert_eq!(channel.name(), "telegram");
    }

    #[tokio::test]
    async fn test_send_without_token_fails() {
        let channel = TelegramChannel::from_config(&TelegramConfig::default());
        let err = channel.send("42", &message()).await.unwrap_err();
        assert!(matches!(err, ChannelError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn test_send_posts_message() {
        let (base, request) = serve_once(200, r#"{"ok":true}"#).await;

        channel(base).send("42", &message()).await.unwrap();

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /bot123:abc/sendMessage"));
        assert!(request.contains(r#""chat_id":"42""#));
        assert!(request.contains(r#""parse_mode":"HTML""#));
        assert!(request.contains("Line 1"));
    }

    #[tokio::test]
    async fn test_api_error() {
        let (base, _request) =
            serve_once(400, r#"{"ok":false,"description":"Bad Request: chat not found"}"#).await;

        let err = channel(base).send("42", &message()).await.unwrap_err();
        match err {
            ChannelError::Api { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("chat not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let (base, _request) =
            serve_once(429, r#"{"ok":false,"parameters":{"retry_after":17}}"#).await;

        let err = channel(base).send("42", &message()).await.unwrap_err();
        assert!(matches!(err, ChannelError::RateLimited { retry_after_secs: 17 }));
    }
}
