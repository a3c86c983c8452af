// src/integrity/report.rs

//! Record output.
//!
//! The monitor talks to a `ReportSink` instead of printing directly. This
//! keeps the loop testable: production code uses [`ConsoleReporter`], tests
//! can collect records in memory instead of scraping stdout.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tracing::warn;

use crate::types::{ChangeEvent, ChangeKind, ColorMode};

/// Timestamp format used on record lines.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Destination for integrity records.
pub trait ReportSink: Send {
    /// Emit one record for a confirmed content change.
    fn record(&mut self, event: &ChangeEvent, digest: &str) -> Result<()>;

    /// Report a file that vanished or became unreadable between detection
    /// and hashing. Must not fail; monitoring continues afterwards.
    fn warn_unreadable(&mut self, event: &ChangeEvent, err: &anyhow::Error);
}

/// Writes colored record lines to stdout and, optionally, their plain form
/// to an append-mode log file.
pub struct ConsoleReporter {
    color: bool,
    log_file: Option<BufWriter<File>>,
}

impl std::fmt::Debug for ConsoleReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleReporter")
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

impl ConsoleReporter {
    pub fn new(mode: ColorMode, log_path: Option<&Path>) -> Result<Self> {
        let color = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        };

        let log_file = match log_path {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("opening record log file at {:?}", path))?;
                Some(BufWriter::new(file))
            }
            None => None,
        };

        Ok(Self { color, log_file })
    }

    /// Uncolored form, also used for the log file.
    pub fn plain_line(event: &ChangeEvent, digest: &str) -> String {
        format!(
            "{} {:<8} {} {}",
            event.timestamp.format(TIMESTAMP_FORMAT),
            event.kind.label(),
            event.path.display(),
            digest
        )
    }

    fn colored_line(event: &ChangeEvent, digest: &str) -> String {
        let stamp = event.timestamp.format(TIMESTAMP_FORMAT).to_string();
        let padded = format!("{:<8}", event.kind.label());
        let label = match event.kind {
            ChangeKind::Created => padded.green().bold().to_string(),
            ChangeKind::Modified => padded.yellow().bold().to_string(),
        };

        format!(
            "{} {} {} {}",
            stamp.cyan(),
            label,
            event.path.display(),
            digest
        )
    }
}

impl ReportSink for ConsoleReporter {
    fn record(&mut self, event: &ChangeEvent, digest: &str) -> Result<()> {
        if self.color {
            println!("{}", Self::colored_line(event, digest));
        } else {
            println!("{}", Self::plain_line(event, digest));
        }

        if let Some(writer) = self.log_file.as_mut() {
            writeln!(writer, "{}", Self::plain_line(event, digest))?;
            writer.flush()?;
        }

        Ok(())
    }

    fn warn_unreadable(&mut self, event: &ChangeEvent, err: &anyhow::Error) {
        warn!(
            path = ?event.path,
            kind = %event.kind,
            error = %err,
            "file unreadable at hash time; skipping"
        );
    }
}
