//! Handles for the engine's long-running tasks.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Owner handle for a spawned engine task with deterministic teardown.
pub struct TaskHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TaskHandle {
    pub(crate) fn new(shutdown: watch::Sender<bool>, task: JoinHandle<()>) -> Self {
        Self { shutdown, task }
    }

    /// Signal the task to stop and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            debug!(%err, "engine task ended abnormally");
        }
    }
}
