//! Poll Loop Implementation

use crate::error::MonitorError;
use crate::source::FeedSource;
use alerting::{AlertRecord, DedupField, Deduplicator, LifecyclePartition, PartitionKind};
use gtfs_feed::AlertDecoder;
use notify::Notifier;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Configuration for the poll loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Wait between successful cycles (minutes, default: 5)
    pub interval_minutes: u64,
    /// Wait before retrying after a failed cycle (seconds, default: 60)
    pub error_backoff_secs: u64,
    /// Field compared by the deduplicator
    pub dedup_field: DedupField,
    /// Also notify alerts that are still active
    pub notify_unresolved: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 5,
            error_backoff_secs: 60,
            dedup_field: DedupField::Description,
            notify_unresolved: false,
        }
    }
}

impl MonitorConfig {
    /// Longest accepted interval (one week)
    pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

    /// Check the timing values.
    ///
    /// Both waits must be non-zero, the interval at most a week, and the
    /// error backoff strictly shorter than the interval.
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.interval_minutes == 0 {
            return Err(MonitorError::Config(
                "interval_minutes must be at least 1".to_string(),
            ));
        }
        if self.interval_minutes > Self::MAX_INTERVAL_MINUTES {
            return Err(MonitorError::Config(format!(
                "interval_minutes must be at most {}",
                Self::MAX_INTERVAL_MINUTES
            )));
        }
        if self.error_backoff_secs == 0 {
            return Err(MonitorError::Config(
                "error_backoff_secs must be at least 1".to_string(),
            ));
        }
        if self.error_backoff() >= self.interval() {
            return Err(MonitorError::Config(format!(
                "error_backoff_secs ({}) must be shorter than the interval ({} minutes)",
                self.error_backoff_secs, self.interval_minutes
            )));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }
}

/// Where the loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Fetching,
    Decoding,
    Deduping,
    Comparing,
    Notifying,
    Sleeping,
    Stopped,
}

/// Deduplicated alerts from one fetch
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Alerts decoded before deduplication
    pub fetched: usize,
    /// Deduplicated alerts, longest description first
    pub alerts: Vec<AlertRecord>,
}

/// Outcome of a successful cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub fetched: usize,
    pub active: usize,
    pub partition: LifecyclePartition,
    /// Subscriber messages delivered
    pub notified: usize,
}

/// Alert monitor
///
/// Holds the last successful snapshot; only one cycle runs at a time.
pub struct Monitor {
    source: Box<dyn FeedSource>,
    decoder: AlertDecoder,
    deduplicator: Deduplicator,
    notifier: Notifier,
    config: MonitorConfig,
    previous: Vec<AlertRecord>,
    state: PollState,
    cycles: u64,
}

impl Monitor {
    /// Create a new monitor
    pub fn new(
        source: Box<dyn FeedSource>,
        decoder: AlertDecoder,
        notifier: Notifier,
        config: MonitorConfig,
    ) -> Self {
        info!("Creating alert monitor with config: {:?}", config);
        Self {
            source,
            decoder,
            deduplicator: Deduplicator::new(config.dedup_field),
            notifier,
            config,
            previous: Vec::new(),
            state: PollState::Idle,
            cycles: 0,
        }
    }

    /// Current loop state
    pub fn state(&self) -> PollState {
        self.state
    }

    /// Last successfully computed snapshot
    pub fn previous(&self) -> &[AlertRecord] {
        &self.previous
    }

    /// Number of successful cycles
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Fetch, decode, and dedupe once without touching the retained snapshot
    pub async fn snapshot(&mut self) -> Result<Snapshot, MonitorError> {
        let result = self.collect().await;
        self.state = PollState::Idle;
        result
    }

    /// Run one full cycle.
    ///
    /// On error the retained snapshot is left as it was, so the next
    /// successful cycle compares against the last good one.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, MonitorError> {
        let snapshot = self.collect().await?;

        self.state = PollState::Comparing;
        let partition = LifecyclePartition::compare(&self.previous, &snapshot.alerts);
        log_partition(&partition);

        self.state = PollState::Notifying;
        let notified = self
            .notifier
            .notify_partition(&partition, self.config.notify_unresolved)
            .await;

        let active = snapshot.alerts.len();
        self.previous = snapshot.alerts;
        self.cycles += 1;
        self.state = PollState::Idle;

        metrics::counter!("transit_alerts_cycles_total").increment(1);
        metrics::gauge!("transit_alerts_active").set(active as f64);

        Ok(CycleReport {
            fetched: snapshot.fetched,
            active,
            partition,
            notified,
        })
    }

    /// Poll until `shutdown` becomes true.
    ///
    /// Cycle errors are logged and retried after the error backoff; they never
    /// end the loop. Shutdown is observed between cycles.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Starting alert monitoring (checking every {} minutes)",
            self.config.interval_minutes
        );

        while !*shutdown.borrow() {
            let delay = match self.run_cycle().await {
                Ok(report) => {
                    info!(
                        fetched = report.fetched,
                        active = report.active,
                        new = report.partition.new.len(),
                        resolved = report.partition.resolved.len(),
                        unresolved = report.partition.unresolved.len(),
                        notified = report.notified,
                        "Cycle complete, next check in {} minutes",
                        self.config.interval_minutes
                    );
                    self.config.interval()
                }
                Err(e) => {
                    let backoff = self.config.error_backoff();
                    error!("Error during monitoring: {}, retrying in {:?}", e, backoff);
                    metrics::counter!("transit_alerts_cycle_errors_total").increment(1);
                    backoff
                }
            };

            self.state = PollState::Sleeping;
            if sleep_or_shutdown(delay, &mut shutdown).await {
                break;
            }
        }

        self.state = PollState::Stopped;
        info!("Monitoring stopped");
    }

    async fn collect(&mut self) -> Result<Snapshot, MonitorError> {
        self.state = PollState::Fetching;
        let data = self.source.fetch().await?;

        self.state = PollState::Decoding;
        let alerts = self.decoder.decode(&data)?;
        let fetched = alerts.len();
        info!("Received {} alerts", fetched);

        self.state = PollState::Deduping;
        let alerts = self.deduplicator.dedup(alerts);
        debug!(fetched, kept = alerts.len(), "Deduplicated alerts");

        Ok(Snapshot { fetched, alerts })
    }
}

/// Sleep for `delay`; returns true if shutdown was requested first
async fn sleep_or_shutdown(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return false,
            changed = shutdown.changed() => {
                if changed.is_err() {
                    // sender gone, nobody can stop us early any more
                    (&mut sleep).await;
                    return false;
                }
                if *shutdown.borrow() {
                    return true;
                }
            }
        }
    }
}

fn log_partition(partition: &LifecyclePartition) {
    if partition.is_empty() {
        debug!("No active alerts in either snapshot");
        return;
    }
    for kind in PartitionKind::ALL {
        let alerts = partition.get(kind);
        if alerts.is_empty() {
            continue;
        }
        let lines: Vec<String> = alerts.iter().map(ToString::to_string).collect();
        info!(
            "{}:\n\t{}",
            kind.as_str().to_uppercase(),
            lines.join("\n\t")
        );
    }
}
