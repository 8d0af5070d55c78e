//! Keeps a live board in sync with the active store.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::controller::WashLifecycle;
use super::projection::{rows, summarize, SummaryCounts, WashRow};

/// A freshly recomputed view of the active set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardUpdate {
    pub rows: Vec<WashRow>,
    pub summary: SummaryCounts,
}

/// Recomputes every snapshot the active store pushes and republishes it as
/// a [`BoardUpdate`]. The task stops when the watcher is dropped.
pub struct BoardWatcher {
    sender: broadcast::Sender<BoardUpdate>,
    handle: JoinHandle<()>,
}

impl BoardWatcher {
    /// Subscribes to the active store and spawns the watch task on the
    /// current runtime.
    pub fn spawn(lifecycle: Arc<WashLifecycle>, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        let mut snapshots = lifecycle.stores().active.subscribe();
        let tx = sender.clone();

        let handle = tokio::spawn(async move {
            loop {
                let snapshot = match snapshots.recv().await {
                    Ok(snapshot) => snapshot,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // The next snapshot is complete, nothing to catch up on.
                        tracing::debug!(skipped, "Board watcher lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };

                let jobs = match lifecycle.recompute_snapshot(snapshot).await {
                    Ok(jobs) => jobs,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to recompute snapshot");
                        continue;
                    }
                };
                let rows = rows(jobs);
                let mut summary = summarize(&rows);
                match lifecycle.stores().history.count().await {
                    Ok(count) => summary.history_count = count,
                    Err(e) => tracing::warn!(error = %e, "Failed to count wash history"),
                }
                // Ignore errors - no active receivers is fine
                let _ = tx.send(BoardUpdate { rows, summary });
            }
            tracing::debug!("Board watcher stopped");
        });

        Self { sender, handle }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardUpdate> {
        self.sender.subscribe()
    }
}

impl Drop for BoardWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
