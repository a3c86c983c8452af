// src/monitor.rs

//! The integrity monitor event loop.
//!
//! Consumes `MonitorEvent`s one at a time in arrival order, hashes changed
//! files on the blocking pool, deduplicates against the digest ledger, and
//! hands confirmed changes to a [`ReportSink`].

use std::fmt;
use std::path::PathBuf;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::integrity::digest::compute_file_digest;
use crate::integrity::ledger::{DigestLedger, Observation};
use crate::integrity::report::ReportSink;
use crate::types::ChangeEvent;

/// Events flowing into the monitor from the watcher and the signal handler.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// A file was created or its contents were (possibly) modified.
    FileChanged(ChangeEvent),
    /// A file left the watched tree. Evicts its ledger entry so a later
    /// re-creation is reported as created again; never reported itself.
    FileRemoved { path: PathBuf },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Drives hashing and reporting in response to `MonitorEvent`s.
pub struct Monitor<R: ReportSink> {
    event_rx: mpsc::Receiver<MonitorEvent>,
    ledger: DigestLedger,
    reporter: R,
}

impl<R: ReportSink> fmt::Debug for Monitor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}

impl<R: ReportSink> Monitor<R> {
    pub fn new(event_rx: mpsc::Receiver<MonitorEvent>, ledger: DigestLedger, reporter: R) -> Self {
        Self {
            event_rx,
            ledger,
            reporter,
        }
    }

    /// Main event loop.
    ///
    /// Runs until the channel closes or a shutdown is requested. A single
    /// unreadable file never terminates the loop.
    pub async fn run(mut self) -> Result<()> {
        info!("integrity monitor started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("monitor event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "monitor received event");

            match event {
                MonitorEvent::FileChanged(change) => self.handle_change(change).await?,
                MonitorEvent::FileRemoved { path } => self.ledger.forget(&path),
                MonitorEvent::ShutdownRequested => {
                    info!("shutdown requested; stopping monitor");
                    break;
                }
            }
        }

        info!("monitor exiting");
        Ok(())
    }

    /// Hash one changed file and report it unless its contents are
    /// unchanged since the last observation.
    async fn handle_change(&mut self, change: ChangeEvent) -> Result<()> {
        let path = change.path.clone();
        let digest = match tokio::task::spawn_blocking(move || compute_file_digest(&path)).await {
            Ok(Ok(digest)) => digest,
            Ok(Err(err)) => {
                // Lost the race with a delete, or a permission problem.
                self.reporter.warn_unreadable(&change, &err);
                return Ok(());
            }
            Err(err) => {
                warn!(path = ?change.path, error = %err, "hashing task failed");
                return Ok(());
            }
        };

        match self.ledger.observe(&change.path, &digest) {
            Observation::Unchanged => {
                debug!(path = ?change.path, "contents unchanged; suppressing record");
            }
            Observation::Changed => self.reporter.record(&change, &digest)?,
        }

        Ok(())
    }
}
