//! Notification channel implementations.

pub mod telegram;

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::message::AlertMessage;

/// Trait for notification channels.
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Check if this channel is enabled/configured.
    fn enabled(&self) -> bool;

    /// Deliver a message to one destination (chat id, channel, address).
    async fn send(&self, destination: &str, message: &AlertMessage) -> Result<(), ChannelError>;
}
