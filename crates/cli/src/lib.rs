//! Transit Alerts Command Line
//!
//! Logging setup, configuration loading, and the two commands behind the
//! `transit-alerts` binary: a one-shot check and the monitoring loop.

pub mod output;
pub mod settings;

pub use settings::AppConfig;

use alert_monitor::{Monitor, MonitorError, Snapshot};
use anyhow::{Context, Result};
use gtfs_feed::{AlertDecoder, FeedClient, FeedError};
use notify::Notifier;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `debug`. Logs go to stderr so that stdout stays
/// clean for alert output, plus `log_file` without colors when given.
pub fn init_logging(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to set tracing subscriber")?;

    Ok(())
}

/// Build a monitor wired to the live feed and the configured notifier
pub fn build_monitor(config: &AppConfig) -> Result<Monitor> {
    let notifier = Notifier::telegram(&config.telegram, config.users.clone());
    let monitor = new_monitor(config, notifier).context("Failed to create feed client")?;
    Ok(monitor)
}

/// Fetch, decode, and dedupe the feed once
pub async fn check_once(config: &AppConfig) -> Result<Snapshot, MonitorError> {
    let mut monitor = new_monitor(config, Notifier::disabled())?;
    info!("Fetching service alerts...");
    monitor.snapshot().await
}

/// Run the monitoring loop until `shutdown` flips to true
pub async fn monitor(config: &AppConfig, shutdown: watch::Receiver<bool>) -> Result<()> {
    let mut monitor = build_monitor(config)?;
    monitor.run(shutdown).await;
    Ok(())
}

fn new_monitor(config: &AppConfig, notifier: Notifier) -> Result<Monitor, FeedError> {
    let client = FeedClient::new(config.feed.clone())?;
    info!("Using alert feed at {}", client.url());

    Ok(Monitor::new(
        Box::new(client),
        AlertDecoder::new(config.feed.language.clone()),
        notifier,
        config.monitor.clone(),
    ))
}
