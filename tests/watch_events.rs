mod common;
use crate::common::init_tracing;
use crate::common::sink::{ChannelSink, SinkEvent, drain_events};

use std::fs;
use std::path::Path;

use tempfile::tempdir;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};

use hashwatch::config::ConfigFile;
use hashwatch::integrity::{DigestLedger, compute_file_digest};
use hashwatch::monitor::{Monitor, MonitorEvent};
use hashwatch::types::ChangeKind;
use hashwatch::watch::{WatchFilter, WatcherHandle, spawn_watcher};

/// sha256("hello")
const HELLO_DIGEST: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

/// Wire the full pipeline over `root` with default config: seed the ledger
/// from whatever already exists, start the watcher, and run a monitor whose
/// records land in the returned receiver.
///
/// The `WatcherHandle` must be kept alive for the duration of the test.
fn start_pipeline(
    root: &Path,
) -> (
    WatcherHandle,
    tokio::sync::mpsc::UnboundedReceiver<SinkEvent>,
) {
    let filter = WatchFilter::from_config(&ConfigFile::default()).unwrap();

    let mut ledger = DigestLedger::new();
    ledger.seed_from_dir(root, &filter).unwrap();

    let (monitor_tx, monitor_rx) = mpsc::channel::<MonitorEvent>(64);
    let handle = spawn_watcher(root, filter, monitor_tx).unwrap();

    let (sink, sink_rx) = ChannelSink::new();
    let monitor = Monitor::new(monitor_rx, ledger, sink);
    tokio::spawn(monitor.run());

    (handle, sink_rx)
}

/// Records whose path ends in `name` (event paths are absolute and may be
/// canonicalized differently than the tempdir path).
fn records_for(events: &[SinkEvent], name: &str) -> Vec<(ChangeKind, String)> {
    events
        .iter()
        .filter_map(|ev| match ev {
            SinkEvent::Record { kind, path, digest } if path.ends_with(name) => {
                Some((*kind, digest.clone()))
            }
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn created_file_is_recorded_with_correct_digest() {
    init_tracing();

    let dir = tempdir().unwrap();
    let (_watcher, mut sink_rx) = start_pipeline(dir.path());

    // Give the OS watcher a brief moment to start.
    sleep(Duration::from_millis(200)).await;

    fs::write(dir.path().join("a.txt"), "hello").unwrap();

    let events = drain_events(&mut sink_rx).await;
    let records = records_for(&events, "a.txt");

    assert!(
        !records.is_empty(),
        "creating a file should produce at least one record"
    );
    assert_eq!(
        records[0].0,
        ChangeKind::Created,
        "first record for a new file should be a creation"
    );

    let hello_records = records.iter().filter(|(_, d)| d == HELLO_DIGEST).count();
    assert_eq!(
        hello_records, 1,
        "exactly one record should carry the digest of the final contents"
    );
}

#[tokio::test]
async fn modified_file_records_digest_of_new_contents() {
    init_tracing();

    let dir = tempdir().unwrap();
    let file = dir.path().join("tracked.txt");
    fs::write(&file, "hello").unwrap();

    // Pipeline starts after the file exists, so the seed scan knows it.
    let (_watcher, mut sink_rx) = start_pipeline(dir.path());
    sleep(Duration::from_millis(200)).await;

    fs::write(&file, "goodbye").unwrap();
    let expected = compute_file_digest(&file).unwrap();

    let events = drain_events(&mut sink_rx).await;
    let records = records_for(&events, "tracked.txt");

    assert!(
        !records.is_empty(),
        "modifying a tracked file should produce a record"
    );
    assert!(
        records.iter().all(|(kind, _)| *kind == ChangeKind::Modified),
        "a pre-existing file should only ever report as modified, got {records:?}"
    );

    let (_, last_digest) = records.last().unwrap();
    assert_eq!(
        last_digest, &expected,
        "the record should carry the digest of the new contents, not the old"
    );
}

#[tokio::test]
async fn rewriting_identical_contents_is_suppressed() {
    init_tracing();

    let dir = tempdir().unwrap();
    let file = dir.path().join("same.txt");
    fs::write(&file, "hello").unwrap();

    let (_watcher, mut sink_rx) = start_pipeline(dir.path());
    sleep(Duration::from_millis(200)).await;

    // Identical contents: the OS reports a modification, the ledger sees the
    // same digest, and no record is emitted.
    fs::write(&file, "hello").unwrap();

    let events = drain_events(&mut sink_rx).await;
    let records = records_for(&events, "same.txt");
    assert!(
        records.is_empty(),
        "rewriting identical contents should not produce records, got {records:?}"
    );
}

#[tokio::test]
async fn hidden_and_ignored_files_produce_no_records() {
    init_tracing();

    let dir = tempdir().unwrap();
    let (_watcher, mut sink_rx) = start_pipeline(dir.path());
    sleep(Duration::from_millis(200)).await;

    fs::write(dir.path().join(".secret"), "hello").unwrap();
    fs::write(dir.path().join("junk.tmp"), "hello").unwrap();
    fs::write(dir.path().join("ok.txt"), "hello").unwrap();

    let events = drain_events(&mut sink_rx).await;

    assert!(records_for(&events, ".secret").is_empty());
    assert!(records_for(&events, "junk.tmp").is_empty());

    let ok_records = records_for(&events, "ok.txt");
    assert!(!ok_records.is_empty(), "ok.txt should have been recorded");
    assert_eq!(ok_records[0].0, ChangeKind::Created);
}

#[tokio::test]
async fn nested_subdirectories_are_watched() {
    init_tracing();

    let dir = tempdir().unwrap();
    let (_watcher, mut sink_rx) = start_pipeline(dir.path());
    sleep(Duration::from_millis(200)).await;

    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    sleep(Duration::from_millis(100)).await;

    fs::write(sub.join("deep.txt"), "hello").unwrap();

    let events = drain_events(&mut sink_rx).await;
    let records = records_for(&events, "deep.txt");

    assert!(
        !records.is_empty(),
        "files in nested subdirectories should be recorded"
    );
    assert!(records.iter().any(|(_, d)| d == HELLO_DIGEST));
}
