// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::monitor::MonitorEvent;
use crate::types::{ChangeEvent, ChangeKind};
use crate::watch::filter::WatchFilter;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// What a notify event means for the monitor.
#[derive(Debug, Clone, Copy)]
enum Action {
    Changed(ChangeKind),
    Removed,
}

/// Spawn a filesystem watcher that observes the given `root` directory
/// recursively and forwards one `MonitorEvent` per affected path.
///
/// - `root` is the watch root against which filter rules are evaluated.
/// - `filter` rejects hidden files, ignored extensions and excluded globs.
/// - `monitor_tx` is the channel into the monitor loop.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    filter: WatchFilter,
    monitor_tx: mpsc::Sender<MonitorEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    // Canonicalize once so we have a stable base path.
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        {
            let event_tx = event_tx.clone();
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Err(err) = event_tx.send(event) {
                        // We can't log via tracing here easily, so fallback to stderr.
                        eprintln!("hashwatch: failed to forward notify event: {err}");
                    }
                }
                Err(err) => {
                    eprintln!("hashwatch: file watch error: {err}");
                }
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    // Async task that consumes notify events and forwards them to the monitor.
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");

            let Some(action) = classify(&event.kind) else {
                continue;
            };

            for path in event.paths {
                if !forward(&root, &filter, &monitor_tx, action, path).await {
                    // The monitor channel is closed; there's no point
                    // keeping the watcher loop alive.
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Map a notify event kind onto a monitor action.
///
/// Rename-from counts as a removal and rename-to as a creation; access and
/// other bookkeeping events are dropped.
fn classify(kind: &EventKind) -> Option<Action> {
    match kind {
        EventKind::Create(_) => Some(Action::Changed(ChangeKind::Created)),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Some(Action::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            Some(Action::Changed(ChangeKind::Created))
        }
        EventKind::Modify(_) => Some(Action::Changed(ChangeKind::Modified)),
        EventKind::Remove(_) => Some(Action::Removed),
        _ => None,
    }
}

/// Filter and forward a single event path. Returns false when the monitor
/// channel has closed and the watcher loop should stop.
async fn forward(
    root: &Path,
    filter: &WatchFilter,
    monitor_tx: &mpsc::Sender<MonitorEvent>,
    action: Action,
    path: PathBuf,
) -> bool {
    let Some(rel) = relative_str(root, &path) else {
        warn!(
            "could not relativize path {:?} against root {:?}",
            path, root
        );
        return true;
    };

    if !filter.accepts(&rel) {
        debug!(rel = %rel, "path filtered out");
        return true;
    }

    let message = match action {
        Action::Removed => MonitorEvent::FileRemoved { path },
        Action::Changed(kind) => {
            // Directory events carry no hashable content.
            if path.is_dir() {
                return true;
            }
            MonitorEvent::FileChanged(ChangeEvent {
                path,
                kind,
                timestamp: Local::now(),
            })
        }
    };

    if let Err(err) = monitor_tx.send(message).await {
        warn!("failed to send monitor event: {err}");
        return false;
    }
    true
}

/// Convert an event path into a string relative to `root`, with forward
/// slashes.
///
/// Event paths usually start with the canonicalized root, so a plain
/// `strip_prefix` does it. Some platforms (notably macOS) report a different
/// absolute prefix for the same directory, so on failure both sides are
/// canonicalized and tried once more. Returns `None` when the path cannot be
/// related to `root` at all.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(rel.to_string_lossy().replace('\\', "/"));
    }

    let root_canon = root.canonicalize().ok()?;
    let path_canon = path.canonicalize().ok()?;
    let rel = path_canon.strip_prefix(&root_canon).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}
