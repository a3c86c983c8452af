// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling the path filter (hidden files, ignored extensions, exclude
//!   globs) from the loaded config.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Normalizing raw notifications into `ChangeEvent`s for the monitor.
//!
//! It does **not** hash anything or write any output; it only turns
//! filesystem changes into monitor-level events.

pub mod filter;
pub mod watcher;

pub use filter::WatchFilter;
pub use watcher::{WatcherHandle, spawn_watcher};
