use notify::{Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, channel};
use std::time::Duration;
use tracing::debug;

use crate::Result;

/// Poll-based watch on the database file, for writes made by other processes
pub struct StoreWatcher {
    _watcher: PollWatcher,
    rx: Receiver<PathBuf>,
}

impl StoreWatcher {
    pub fn new(db_path: &Path, interval: Duration) -> Result<Self> {
        let (tx, rx) = channel();

        let config = notify::Config::default()
            .with_poll_interval(interval)
            .with_compare_contents(true);

        let mut watcher = PollWatcher::new(
            move |res: std::result::Result<Event, notify::Error>| {
                if let Ok(event) = res
                    && matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
                {
                    for path in event.paths {
                        let _ = tx.send(path);
                    }
                }
            },
            config,
        )?;

        watcher.watch(db_path, RecursiveMode::NonRecursive)?;
        debug!(path = %db_path.display(), "watching database file");

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Wait up to `timeout` for a change. Queued events from the same burst
    /// are drained so that one refetch covers them.
    pub fn wait(&self, timeout: Duration) -> WaitResult {
        match self.rx.recv_timeout(timeout) {
            Ok(_) => {
                let drained = self.rx.try_iter().count();
                WaitResult::Changed { coalesced: drained }
            }
            Err(RecvTimeoutError::Timeout) => WaitResult::Idle,
            Err(RecvTimeoutError::Disconnected) => WaitResult::Closed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitResult {
    Changed { coalesced: usize },
    Idle,
    Closed,
}
