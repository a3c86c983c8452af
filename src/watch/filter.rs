// src/watch/filter.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::model::ConfigFile;

/// Compiled accept/reject rules for paths under the watch root.
///
/// Paths are tested in their relative, forward-slash form (e.g.
/// `"src/notes/a.txt"`). A path is rejected when any of these hold:
///
/// - a component starts with a dot and `include_hidden` is off,
/// - the path ends with one of the ignored extensions,
/// - the path matches an exclude glob.
#[derive(Clone)]
pub struct WatchFilter {
    exclude_set: Option<GlobSet>,
    ignore_extensions: Vec<String>,
    include_hidden: bool,
}

impl fmt::Debug for WatchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchFilter")
            .field("ignore_extensions", &self.ignore_extensions)
            .field("include_hidden", &self.include_hidden)
            .finish_non_exhaustive()
    }
}

impl WatchFilter {
    /// Compile the filter from a validated config.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let exclude_set = if cfg.watch.exclude.is_empty() {
            None
        } else {
            Some(
                build_globset(&cfg.watch.exclude)
                    .context("building exclude globset from [watch].exclude")?,
            )
        };

        Ok(Self {
            exclude_set,
            ignore_extensions: cfg.watch.ignore_extensions.clone(),
            include_hidden: cfg.watch.include_hidden,
        })
    }

    /// Returns true if events for the given path (relative to the watch
    /// root) should be processed.
    pub fn accepts(&self, rel_path: &str) -> bool {
        if !self.include_hidden
            && rel_path
                .split('/')
                .any(|component| component.starts_with('.'))
        {
            return false;
        }

        if self
            .ignore_extensions
            .iter()
            .any(|ext| rel_path.ends_with(ext.as_str()))
        {
            return false;
        }

        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }

        true
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
