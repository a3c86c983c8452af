// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::types::ColorMode;

/// Command-line arguments for `hashwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hashwatch",
    version,
    about = "Watch a directory and log SHA-256 fingerprints of changed files.",
    long_about = None
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start monitoring a directory.
    Start(StartArgs),
}

/// Arguments for `hashwatch start`.
#[derive(Debug, Clone, Args)]
pub struct StartArgs {
    /// Directory to monitor.
    #[arg(long, value_name = "PATH")]
    pub dir: PathBuf,

    /// Path to the config file (TOML).
    ///
    /// Default: `Hashwatch.toml` in the current working directory. A missing
    /// default config simply means built-in defaults; a missing explicitly
    /// given path is an error.
    #[arg(long, value_name = "PATH", default_value = "Hashwatch.toml")]
    pub config: String,

    /// Append plain-text change records to this file, in addition to the
    /// terminal output.
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `HASHWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// When to colorize record output (auto, always, never).
    ///
    /// Overrides `[output].color` from the config file.
    #[arg(long, value_name = "WHEN")]
    pub color: Option<ColorMode>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
