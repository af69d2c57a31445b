//! Index status polling
//!
//! [`IndexPoller`] owns a spawned task that asks the backend for a project's
//! indexing status right away and then once per interval, until the status
//! is terminal, a request fails, or the poller is stopped. Dropping the
//! poller stops the task.

use deepcode_client::{ApiError, IndexingApi};
use deepcode_core::IndexStatusResponse;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// One tick of the poll loop
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// A status snapshot. The loop ends after a terminal one.
    Status(IndexStatusResponse),
    /// The status request failed. The loop has ended.
    Failed(ApiError),
}

/// Handle to a running poll loop
#[derive(Debug)]
pub struct IndexPoller {
    project_id: String,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    events: mpsc::UnboundedReceiver<PollEvent>,
}

impl IndexPoller {
    /// Start polling `project_id` every `interval`
    pub fn start<B>(backend: Arc<B>, project_id: impl Into<String>, interval: Duration) -> Self
    where
        B: IndexingApi + ?Sized + 'static,
    {
        let project_id = project_id.into();
        let cancel = CancellationToken::new();
        let (tx, events) = mpsc::unbounded_channel();

        let task_cancel = cancel.clone();
        let task_project = project_id.clone();
        let task = tokio::spawn(async move {
            poll_loop(backend, task_project, interval, tx, task_cancel).await;
        });

        debug!(project_id = %project_id, interval_ms = interval.as_millis() as u64, "index polling started");
        Self {
            project_id,
            cancel,
            task: Some(task),
            events,
        }
    }

    /// Project being polled
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Next tick. `None` once the loop has ended and every event was read.
    pub async fn next(&mut self) -> Option<PollEvent> {
        self.events.recv().await
    }

    /// Stop the loop. Already queued events can still be read.
    pub fn stop(&mut self) {
        if !self.cancel.is_cancelled() {
            debug!(project_id = %self.project_id, "index polling stopped");
        }
        self.cancel.cancel();
        self.task = None;
    }

    /// Whether the loop is still running
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for IndexPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop<B>(
    backend: Arc<B>,
    project_id: String,
    interval: Duration,
    tx: mpsc::UnboundedSender<PollEvent>,
    cancel: CancellationToken,
) where
    B: IndexingApi + ?Sized,
{
    loop {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = backend.index_status(&project_id) => result,
        };

        match result {
            Ok(status) => {
                let terminal = status.status.is_terminal();
                debug!(
                    project_id = %project_id,
                    status = %status.status,
                    progress = status.percent(),
                    "index status"
                );
                if tx.send(PollEvent::Status(status)).is_err() || terminal {
                    break;
                }
            }
            Err(err) => {
                warn!(project_id = %project_id, error = %err, "index status request failed");
                let _ = tx.send(PollEvent::Failed(err));
                break;
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
