//! A `ReportSink` that forwards records over a channel, so tests can drain
//! and assert on them instead of scraping stdout.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::time::{Duration, timeout};

use hashwatch::integrity::ReportSink;
use hashwatch::types::{ChangeEvent, ChangeKind};

/// One observation made by the monitor, as seen by the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Record {
        kind: ChangeKind,
        path: PathBuf,
        digest: String,
    },
    Unreadable {
        path: PathBuf,
    },
}

pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SinkEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SinkEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ReportSink for ChannelSink {
    fn record(&mut self, event: &ChangeEvent, digest: &str) -> anyhow::Result<()> {
        self.tx
            .send(SinkEvent::Record {
                kind: event.kind,
                path: event.path.clone(),
                digest: digest.to_string(),
            })
            .map_err(|e| anyhow::anyhow!("sink channel closed: {e}"))
    }

    fn warn_unreadable(&mut self, event: &ChangeEvent, _err: &anyhow::Error) {
        let _ = self.tx.send(SinkEvent::Unreadable {
            path: event.path.clone(),
        });
    }
}

/// Drain sink events until none arrive within the timeout window.
pub async fn drain_events(rx: &mut mpsc::UnboundedReceiver<SinkEvent>) -> Vec<SinkEvent> {
    let mut events = Vec::new();

    loop {
        match timeout(Duration::from_millis(500), rx.recv()).await {
            Ok(Some(ev)) => events.push(ev),
            Ok(None) | Err(_) => break,
        }
    }

    events
}
