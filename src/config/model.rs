// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::ColorMode;

/// Top-level configuration as read from `Hashwatch.toml`.
///
/// ```toml
/// [watch]
/// exclude = ["target/**", "**/*.log"]
/// ignore_extensions = [".swp", ".tmp"]
/// include_hidden = false
///
/// [output]
/// color = "auto"
/// log_file = "changes.log"
/// ```
///
/// All sections are optional and have reasonable defaults. This raw form is
/// what `serde` deserializes; [`ConfigFile`] is the validated form the rest
/// of the application works with.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Path filtering rules from `[watch]`.
    #[serde(default)]
    pub watch: WatchSection,

    /// Record output behaviour from `[output]`.
    #[serde(default)]
    pub output: OutputSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Glob patterns (relative to the watch root) whose matches are never
    /// hashed or reported.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// File name suffixes to skip, editor droppings and partial downloads
    /// by default. Each entry must start with a dot.
    #[serde(default = "default_ignore_extensions")]
    pub ignore_extensions: Vec<String>,

    /// Whether files and directories whose name starts with a dot are
    /// monitored. Off by default.
    #[serde(default)]
    pub include_hidden: bool,
}

fn default_ignore_extensions() -> Vec<String> {
    [".swp", ".swo", ".tmp", ".part", ".crdownload"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            ignore_extensions: default_ignore_extensions(),
            include_hidden: false,
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OutputSection {
    /// `"auto"`, `"always"` or `"never"`.
    #[serde(default)]
    pub color: ColorMode,

    /// Optional file that receives the plain (uncolored) form of every
    /// record line, append mode. `--log` on the CLI takes precedence.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Validated configuration.
///
/// Construct via `TryFrom<RawConfigFile>` (see `validate.rs`) or
/// [`ConfigFile::default`] when no config file is present.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub watch: WatchSection,
    pub output: OutputSection,
}

impl ConfigFile {
    /// Assemble a `ConfigFile` from already-validated sections.
    pub(crate) fn new_unchecked(watch: WatchSection, output: OutputSection) -> Self {
        Self { watch, output }
    }
}
