use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::Deserialize;

/// Kind of filesystem change reported for a watched file.
///
/// Removals and renames are deliberately absent: the watcher consumes them
/// internally (ledger eviction) and never reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
}

impl ChangeKind {
    /// Lowercase label used in record lines and the plain log file.
    pub fn label(&self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Modified => "modified",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A discrete change observed under the watch root.
///
/// Created once per detected filesystem change, stamped at detection time,
/// and discarded after one record line has been emitted (or suppressed).
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
    pub timestamp: DateTime<Local>,
}

/// When to colorize record output.
///
/// - `auto`: color only when stdout is a terminal (default).
/// - `always` / `never`: force the choice regardless of the output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl Default for ColorMode {
    fn default() -> Self {
        ColorMode::Auto
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            other => Err(format!(
                "invalid color mode: {other} (expected \"auto\", \"always\" or \"never\")"
            )),
        }
    }
}
