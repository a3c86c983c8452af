// src/config/mod.rs

//! Configuration loading and validation.
//!
//! The config file is optional: when the default `Hashwatch.toml` is absent,
//! the built-in defaults apply (see `model.rs`). Only an explicitly named
//! config path is required to exist.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, OutputSection, RawConfigFile, WatchSection};
