//! Transit Alerts - Main Entry Point

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use cli::{init_logging, output, AppConfig};
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "transit-alerts")]
#[command(about = "Fetch and monitor GTFS-Realtime transit service alerts", long_about = None)]
#[command(version)]
struct Cli {
    /// Keep polling and report alert changes
    #[arg(long)]
    monitor: bool,

    /// Minutes between checks in monitor mode (default: from config, 5)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    /// Print alerts as JSON
    #[arg(long)]
    json: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Configuration file (default: search standard locations)
    #[arg(long, value_name = "PATH", env = "TRANSIT_ALERTS_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.debug, cli.log_file.as_deref())?;

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(interval) = cli.interval {
        config.monitor.interval_minutes = interval;
        config.monitor.validate().context("Invalid --interval")?;
    }

    if cli.monitor {
        return monitor(&config).await;
    }

    let snapshot = cli::check_once(&config).await?;
    if cli.json {
        println!("{}", output::format_json(&snapshot.alerts)?);
    } else {
        println!("{}", output::format_report(&snapshot.alerts, Local::now()));
    }
    Ok(())
}

async fn monitor(config: &AppConfig) -> Result<()> {
    info!("=== Transit Alerts v{} ===", env!("CARGO_PKG_VERSION"));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Monitoring stopped by user");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    cli::monitor(config, shutdown_rx).await
}
