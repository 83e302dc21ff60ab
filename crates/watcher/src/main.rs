//! usb-disk-watcher
//!
//! Observes removable mass-storage disk lifecycle events and maintains a
//! live view of the currently-known disks, logging every change. Raw
//! events are fed through a session adapter; this binary ships the
//! scenario-replay adapter, which scripts deliveries from a TOML file.

mod config;
mod replay;

use anyhow::{Context, Result};
use clap::Parser;
use common::setup_logging;
use monitor::DiskMonitor;
use replay::{ReplaySession, Scenario};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};
use types::ServiceStatus;

#[derive(Parser, Debug)]
#[command(name = "usb-disk-watcher")]
#[command(
    author,
    version,
    about = "USB disk watcher - observe removable disk attach/detach events"
)]
#[command(long_about = "
Maintains a deduplicated view of the removable mass-storage disks known
to the host, fed by a session adapter, and logs the full disk set on
every change.

EXAMPLES:
    # Replay a scripted scenario
    usb-disk-watcher --scenario demo.toml

    # Run with custom config
    usb-disk-watcher --config /path/to/watcher.toml

    # Run with debug logging
    usb-disk-watcher --log-level debug

CONFIGURATION:
    The watcher looks for configuration files in the following order:
    1. Path specified with --config
    2. ~/.config/usb-disk-monitor/watcher.toml
    3. /etc/usb-disk-monitor/watcher.toml
    4. Built-in defaults
")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<std::path::PathBuf>,

    /// Save default configuration to default location and exit
    #[arg(long)]
    save_config: bool,

    /// Path to a TOML scenario file (overrides config)
    #[arg(short, long, value_name = "PATH")]
    scenario: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle --save-config flag early (before loading config)
    if args.save_config {
        let config = config::WatcherConfig::default();
        let path = config::WatcherConfig::default_path();
        config.save(&path).context("Failed to save configuration")?;
        println!("Configuration saved to: {}", path.display());
        return Ok(());
    }

    let config = if let Some(ref path) = args.config {
        config::WatcherConfig::load(Some(path.clone())).context("Failed to load configuration")?
    } else {
        config::WatcherConfig::load_or_default()
    };

    // Use CLI log level if specified, otherwise use config value
    let log_level = args
        .log_level
        .as_deref()
        .unwrap_or(&config.watcher.log_level);

    setup_logging(log_level).context("Failed to setup logging")?;

    info!("usb-disk-watcher v{}", env!("CARGO_PKG_VERSION"));
    info!("Log level: {}", log_level);

    let session = match args.scenario.as_deref().or(config.replay.scenario.as_deref()) {
        Some(path) => ReplaySession::from_file(path)?,
        None => {
            warn!("No scenario configured; observing an empty event stream");
            ReplaySession::new(Scenario::default())
        }
    };

    let disk_monitor = DiskMonitor::with_capacity(session, config.watcher.event_capacity);

    // Subscribe before starting so no early snapshot is missed.
    let mut disk_rx = disk_monitor.subscribe_disks();
    let mut status_rx = disk_monitor.subscribe_status();

    let subscriber = tokio::spawn(async move {
        loop {
            tokio::select! {
                update = disk_rx.recv() => match update {
                    Ok(Ok(disks)) => {
                        info!("Known disks: {}", disks.len());
                        for disk in &disks {
                            info!(
                                "  {} [{}] {} bytes, media {:?}, mounted at {:?}",
                                disk.name, disk.id, disk.size_bytes, disk.media_name,
                                disk.mount_path
                            );
                        }
                    }
                    Ok(Err(e)) => {
                        warn!("Disk stream terminated abnormally: {}", e);
                        break;
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Missed {} snapshot(s), continuing from latest", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                changed = status_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    info!("Status: {:?}", *status_rx.borrow());
                }
            }
        }
    });

    disk_monitor.start_observing();
    if disk_monitor.current_status() != ServiceStatus::Running {
        warn!("Observation did not start; check the session configuration");
    }

    signal::ctrl_c().await.context("Failed to listen for ctrl-c")?;
    info!("Shutting down...");

    disk_monitor.stop_observing();
    subscriber.abort();

    info!(
        "Final snapshot: {} disk(s) known at shutdown",
        disk_monitor.snapshot().len()
    );

    Ok(())
}
