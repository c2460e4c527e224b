//! Alert Notifications
//!
//! Delivers lifecycle changes (new, resolved, still active) to subscribers.
//! Delivery is best-effort: a failure for one subscriber is logged and never
//! stops delivery to the others or reaches the caller.
//!
//! - [`NotifyChannel`] defines how a message reaches a destination
//! - [`TelegramChannel`] implements the Telegram Bot API
//! - [`Notifier`] renders messages and dispatches them per subscriber

pub mod channels;
pub mod error;
mod message;
mod subscriber;

pub use channels::telegram::{TelegramChannel, TelegramConfig};
pub use channels::NotifyChannel;
pub use error::ChannelError;
pub use message::{AlertMessage, PARSE_MODE_HTML};
pub use subscriber::Subscriber;

use alerting::{AlertRecord, LifecyclePartition, PartitionKind};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Per-subscriber notification dispatcher.
pub struct Notifier {
    channel: Option<Arc<dyn NotifyChannel>>,
    subscribers: Vec<Subscriber>,
}

impl Notifier {
    /// Create a notifier delivering through `channel` to `subscribers`.
    pub fn new(channel: Arc<dyn NotifyChannel>, subscribers: Vec<Subscriber>) -> Self {
        if !channel.enabled() {
            info!(channel = channel.name(), "Notification channel not configured");
        } else if subscribers.is_empty() {
            info!(channel = channel.name(), "No subscribers configured");
        } else {
            info!(
                channel = channel.name(),
                subscriber_count = subscribers.len(),
                "Notification system initialized"
            );
        }

        Self {
            channel: Some(channel),
            subscribers,
        }
    }

    /// Create a notifier from Telegram configuration.
    pub fn telegram(config: &TelegramConfig, subscribers: Vec<Subscriber>) -> Self {
        Self::new(Arc::new(TelegramChannel::from_config(config)), subscribers)
    }

    /// Create a notifier that sends nothing.
    pub fn disabled() -> Self {
        Self {
            channel: None,
            subscribers: Vec::new(),
        }
    }

    /// Whether any message could be delivered.
    pub fn is_active(&self) -> bool {
        self.channel.as_ref().is_some_and(|c| c.enabled()) && !self.subscribers.is_empty()
    }

    /// Configured subscribers.
    pub fn subscribers(&self) -> &[Subscriber] {
        &self.subscribers
    }

    /// Notify one destination about alerts of one kind.
    ///
    /// Applies the subscriber's filters. Returns whether a message was
    /// delivered; failures are logged, never returned.
    pub async fn notify(
        &self,
        kind: PartitionKind,
        alerts: &[AlertRecord],
        subscriber: &Subscriber,
    ) -> bool {
        let Some(channel) = self.channel.as_ref().filter(|c| c.enabled()) else {
            return false;
        };

        let selected = subscriber.select(alerts);
        let Some(message) = AlertMessage::from_alerts(kind, &selected) else {
            debug!(
                subscriber = %subscriber.username,
                kind = %kind,
                "Nothing to send"
            );
            return false;
        };

        match channel.send(&subscriber.chat_id, &message).await {
            Ok(()) => {
                info!(
                    subscriber = %subscriber.username,
                    kind = %kind,
                    count = selected.len(),
                    "Notification sent"
                );
                true
            }
            Err(e) => {
                error!(
                    channel = channel.name(),
                    subscriber = %subscriber.username,
                    kind = %kind,
                    error = %e,
                    "Failed to send notification"
                );
                false
            }
        }
    }

    /// Notify every subscriber about alerts of one kind.
    ///
    /// Returns the number of subscribers that received a message.
    pub async fn notify_all(&self, kind: PartitionKind, alerts: &[AlertRecord]) -> usize {
        if alerts.is_empty() || !self.is_active() {
            return 0;
        }

        let mut delivered = 0;
        for subscriber in &self.subscribers {
            if self.notify(kind, alerts, subscriber).await {
                delivered += 1;
            }
        }
        delivered
    }

    /// Notify every subscriber about a lifecycle partition.
    ///
    /// New and resolved alerts are always sent; still-active ones only when
    /// `include_unresolved` is set.
    pub async fn notify_partition(
        &self,
        partition: &LifecyclePartition,
        include_unresolved: bool,
    ) -> usize {
        let mut delivered = 0;
        for kind in PartitionKind::ALL {
            if kind == PartitionKind::Unresolved && !include_unresolved {
                continue;
            }
            delivered += self.notify_all(kind, partition.get(kind)).await;
        }
        delivered
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::disabled()
    }
}
