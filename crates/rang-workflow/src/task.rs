//! Cancellable background task handles
//!
//! Polling and progress simulation run as spawned tasks owned by the
//! engine through [`TaskHandle`]. Cancellation is structural: dropping the
//! handle aborts the task, so a torn-down workflow can never leave a timer
//! firing behind it. `stop` is the graceful variant used on reset.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle to a spawned workflow task. Aborts the task on drop.
pub struct TaskHandle {
    shutdown_tx: mpsc::Sender<()>,
    join: JoinHandle<()>,
}

impl TaskHandle {
    pub fn new(shutdown_tx: mpsc::Sender<()>, join: JoinHandle<()>) -> Self {
        Self { shutdown_tx, join }
    }

    /// Signal the task to stop at its next suspension point. Returns
    /// immediately; the drop abort backstops a task that never listens.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.try_send(());
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.join.abort();
    }
}
