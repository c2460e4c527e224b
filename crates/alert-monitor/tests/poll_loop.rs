//! End-to-end poll loop behaviour on a paused clock.

use alert_monitor::{FeedSource, Monitor, MonitorConfig, PollState};
use async_trait::async_trait;
use gtfs_feed::proto::{Alert, FeedEntity, FeedHeader, FeedMessage, TranslatedString, Translation};
use gtfs_feed::{AlertDecoder, FeedError};
use notify::{AlertMessage, ChannelError, Notifier, NotifyChannel, Subscriber};
use prost::Message;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Vec<u8>, FeedError>>>,
}

#[async_trait]
impl FeedSource for ScriptedSource {
    async fn fetch(&self) -> Result<Vec<u8>, FeedError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FeedError::Network("script exhausted".to_string())))
    }
}

struct RecordingChannel {
    sent: mpsc::UnboundedSender<(Instant, String)>,
}

#[async_trait]
impl NotifyChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn enabled(&self) -> bool {
        true
    }

    async fn send(&self, _destination: &str, message: &AlertMessage) -> Result<(), ChannelError> {
        let _ = self.sent.send((Instant::now(), message.text.clone()));
        Ok(())
    }
}

fn text(value: &str) -> Option<TranslatedString> {
    Some(TranslatedString {
        translation: vec![Translation {
            text: value.to_string(),
            language: None,
        }],
    })
}

fn feed(alerts: &[(&str, &str)]) -> Vec<u8> {
    FeedMessage {
        header: FeedHeader {
            gtfs_realtime_version: "2.0".to_string(),
            ..Default::default()
        },
        entity: alerts
            .iter()
            .enumerate()
            .map(|(i, (header, description))| FeedEntity {
                id: format!("alert-{}", i),
                is_deleted: None,
                alert: Some(Alert {
                    header_text: text(header),
                    description_text: text(description),
                    ..Default::default()
                }),
            })
            .collect(),
    }
    .encode_to_vec()
}

#[tokio::test(start_paused = true)]
async fn test_failed_cycle_backs_off_and_keeps_baseline() {
    let source = ScriptedSource {
        responses: Mutex::new(
            vec![
                Ok(feed(&[("Line 1", "Delays at Union")])),
                Err(FeedError::Network("connection reset".to_string())),
                Ok(feed(&[
                    ("Line 1", "Delays at Union"),
                    ("Line 2", "Shuttle buses between Kipling and Jane"),
                ])),
            ]
            .into(),
        ),
    };

    let (sent_tx, mut sent_rx) = mpsc::unbounded_channel();
    let notifier = Notifier::new(
        Arc::new(RecordingChannel { sent: sent_tx }),
        vec![Subscriber::new("alice", "1")],
    );

    let mut monitor = Monitor::new(
        Box::new(source),
        AlertDecoder::default(),
        notifier,
        MonitorConfig::default(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let start = Instant::now();
    let handle = tokio::spawn(async move {
        monitor.run(shutdown_rx).await;
        monitor
    });

    let (at, first) = sent_rx.recv().await.unwrap();
    assert_eq!(at.duration_since(start), Duration::ZERO);
    assert!(first.contains("NEW SERVICE ALERTS"));
    assert!(first.contains("Line 1"));

    // cycle at 300s fails, retry 60s later sees only Line 2 as new
    let (at, second) = sent_rx.recv().await.unwrap();
    assert_eq!(at.duration_since(start), Duration::from_secs(360));
    assert!(second.contains("NEW SERVICE ALERTS"));
    assert!(second.contains("Line 2"));
    assert!(!second.contains("Line 1"));

    shutdown_tx.send(true).unwrap();
    let monitor = handle.await.unwrap();

    assert_eq!(monitor.state(), PollState::Stopped);
    assert_eq!(monitor.cycles(), 2);
    assert_eq!(monitor.previous().len(), 2);
    assert!(sent_rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_unresolved_notifications_when_enabled() {
    let source = ScriptedSource {
        responses: Mutex::new(
            vec![
                Ok(feed(&[("Line 1", "Delays at Union")])),
                Ok(feed(&[("Line 1", "Delays at Union")])),
            ]
            .into(),
        ),
    };

    let (sent_tx, mut sent_rx) = mpsc::unbounded_channel();
    let notifier = Notifier::new(
        Arc::new(RecordingChannel { sent: sent_tx }),
        vec![Subscriber::new("alice", "1")],
    );
    let config = MonitorConfig {
        notify_unresolved: true,
        ..Default::default()
    };

    let mut monitor = Monitor::new(Box::new(source), AlertDecoder::default(), notifier, config);

    let first = monitor.run_cycle().await.unwrap();
    assert_eq!(first.notified, 1);
    let second = monitor.run_cycle().await.unwrap();
    assert_eq!(second.notified, 1);
    assert!(second.partition.new.is_empty());

    let (_, _) = sent_rx.recv().await.unwrap();
    let (_, still_active) = sent_rx.recv().await.unwrap();
    assert!(still_active.contains("STILL ACTIVE"));
}
