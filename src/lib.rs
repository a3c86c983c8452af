// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod integrity;
pub mod logging;
pub mod monitor;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::StartArgs;
use crate::config::loader::{default_config_path, load_and_validate};
use crate::config::model::ConfigFile;
use crate::errors::HashwatchError;
use crate::integrity::{ConsoleReporter, DigestLedger};
use crate::monitor::{Monitor, MonitorEvent};
use crate::watch::WatchFilter;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - root validation
/// - config loading
/// - the initial digest scan
/// - the file watcher
/// - Ctrl-C handling
/// - the monitor loop
pub async fn run(args: StartArgs) -> Result<()> {
    let root = validate_root(&args.dir)?;

    let cfg = resolve_config(&args.config)?;

    let filter = WatchFilter::from_config(&cfg)?;

    let color = args.color.unwrap_or(cfg.output.color);
    let log_path = args.log.clone().or_else(|| cfg.output.log_file.clone());
    let reporter = ConsoleReporter::new(color, log_path.as_deref())?;

    // Seed the ledger before watching starts, so pre-existing files report
    // as modified rather than created on their first content change.
    let mut ledger = DigestLedger::new();
    let seeded = ledger.seed_from_dir(&root, &filter)?;
    info!(files = seeded, "seeded digest ledger from initial scan");

    // Monitor event channel.
    let (monitor_tx, monitor_rx) = mpsc::channel::<MonitorEvent>(64);

    // Dropping the handle stops watching; keep it for the whole run.
    let _watcher_handle = watch::spawn_watcher(root, filter, monitor_tx.clone())?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = monitor_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(MonitorEvent::ShutdownRequested).await;
        });
    }

    let monitor = Monitor::new(monitor_rx, ledger, reporter);
    monitor.run().await?;
    Ok(())
}

/// The root must exist and be a directory before monitoring starts.
fn validate_root(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        return Err(HashwatchError::ConfigError(format!(
            "watch directory does not exist: {}",
            dir.display()
        ))
        .into());
    }
    if !dir.is_dir() {
        return Err(HashwatchError::ConfigError(format!(
            "watch path is not a directory: {}",
            dir.display()
        ))
        .into());
    }
    Ok(dir.to_path_buf())
}

/// Load the config file, falling back to built-in defaults when the default
/// path is simply absent. An explicitly named path must exist.
fn resolve_config(config: &str) -> Result<ConfigFile> {
    let config_path = PathBuf::from(config);
    if config_path.exists() {
        return Ok(load_and_validate(&config_path)?);
    }
    if config_path == default_config_path() {
        debug!("no {:?} found; using built-in defaults", config_path);
        return Ok(ConfigFile::default());
    }
    Err(HashwatchError::ConfigError(format!(
        "config file not found: {}",
        config_path.display()
    ))
    .into())
}
