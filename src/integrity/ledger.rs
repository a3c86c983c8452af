// src/integrity/ledger.rs

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::integrity::digest::compute_file_digest;
use crate::watch::filter::WatchFilter;

/// Whether an observed digest differs from the last one seen for its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Changed,
    Unchanged,
}

/// In-memory record of the last digest seen per path.
///
/// Never persisted; each run starts empty and is seeded by the initial scan.
/// The ledger exists to suppress records whose content digest is unchanged,
/// e.g. duplicate OS notifications or metadata-only modifications.
#[derive(Debug, Default)]
pub struct DigestLedger {
    digests: HashMap<PathBuf, String>,
}

impl DigestLedger {
    pub fn new() -> Self {
        Self {
            digests: HashMap::new(),
        }
    }

    /// Record `digest` for `path`.
    ///
    /// Returns `Unchanged` when the stored digest is identical, `Changed`
    /// when the path is new or its contents differ (the ledger is updated in
    /// that case).
    pub fn observe(&mut self, path: &Path, digest: &str) -> Observation {
        match self.digests.get(path) {
            Some(old) if old == digest => Observation::Unchanged,
            _ => {
                self.digests.insert(path.to_path_buf(), digest.to_string());
                Observation::Changed
            }
        }
    }

    /// Drop the entry for a path that left the watched tree, so a later
    /// re-creation is observed as a change again.
    pub fn forget(&mut self, path: &Path) {
        if self.digests.remove(path).is_some() {
            debug!("evicted ledger entry for {:?}", path);
        }
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// Walk `root` and seed the ledger with the digest of every accepted
    /// file, returning how many were seeded.
    ///
    /// Files that cannot be hashed are warned about and skipped; symlinks
    /// are not followed.
    pub fn seed_from_dir(&mut self, root: &Path, filter: &WatchFilter) -> Result<usize> {
        let mut seeded = 0usize;
        let mut stack = vec![root.to_path_buf()];

        while let Some(dir) = stack.pop() {
            let entries =
                fs::read_dir(&dir).with_context(|| format!("reading directory {:?}", dir))?;

            for entry in entries {
                let entry = entry.with_context(|| format!("reading entry in {:?}", dir))?;
                let path = entry.path();

                let rel = match path.strip_prefix(root) {
                    Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
                    Err(_) => continue,
                };
                if !filter.accepts(&rel) {
                    continue;
                }

                // file_type() does not follow symlinks, so links fall through.
                let file_type = entry
                    .file_type()
                    .with_context(|| format!("inspecting entry {:?}", path))?;

                if file_type.is_dir() {
                    stack.push(path);
                } else if file_type.is_file() {
                    match compute_file_digest(&path) {
                        Ok(digest) => {
                            self.digests.insert(path, digest);
                            seeded += 1;
                        }
                        Err(err) => {
                            warn!(
                                path = ?path,
                                error = %err,
                                "failed to hash file during initial scan; skipping"
                            );
                        }
                    }
                }
            }
        }

        Ok(seeded)
    }
}
