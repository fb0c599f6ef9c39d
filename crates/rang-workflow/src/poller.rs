//! Status polling for queued colorization requests
//!
//! Fixed-interval polling against the status endpoint until a terminal
//! status is observed. The poll loop is a cancellable task: it exits on
//! terminal status, on a stale generation, and on shutdown/abort from the
//! owning handle, so no timer outlives the workflow that started it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use rang_core::models::{ColorizeStatus, ImageRef};
use rang_core::{AppError, ColorizeBackend};

use crate::engine::{apply_complete, apply_failure};
use crate::notify::Notifier;
use crate::state::WorkflowState;
use crate::task::TaskHandle;

/// Spawn the polling task for a queued request. Each response is applied
/// only if the workflow is still on `generation`.
pub fn spawn_poller(
    backend: Arc<dyn ColorizeBackend>,
    request_id: String,
    interval: Duration,
    generation: u64,
    state: Arc<Mutex<WorkflowState>>,
    notifier: Arc<dyn Notifier>,
) -> TaskHandle {
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

    let join = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::debug!(request_id = %request_id, "Polling cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    if stale(&state, generation) {
                        tracing::debug!(request_id = %request_id, "Workflow moved on, stopping poll");
                        break;
                    }

                    match backend.status(&request_id).await {
                        Ok(response) => {
                            tracing::debug!(
                                request_id = %request_id,
                                status = %response.status,
                                "Poll response"
                            );
                            match response.status {
                                ColorizeStatus::Processing => {}
                                ColorizeStatus::Complete => {
                                    match response.colorized_url {
                                        Some(url) => {
                                            apply_complete(
                                                &state,
                                                notifier.as_ref(),
                                                generation,
                                                ImageRef::Remote(url),
                                            );
                                        }
                                        None => {
                                            let err = AppError::MalformedResponse(
                                                "Complete response missing colorized_url"
                                                    .to_string(),
                                            );
                                            apply_failure(
                                                &state,
                                                notifier.as_ref(),
                                                generation,
                                                &err,
                                            );
                                        }
                                    }
                                    break;
                                }
                                ColorizeStatus::Failed => {
                                    let err = AppError::ServiceFailed(
                                        response
                                            .error_message
                                            .unwrap_or_else(|| "Colorization failed".to_string()),
                                    );
                                    apply_failure(&state, notifier.as_ref(), generation, &err);
                                    break;
                                }
                            }
                        }
                        Err(e) => {
                            tracing::error!(
                                request_id = %request_id,
                                error = %e,
                                "Status poll failed"
                            );
                            apply_failure(&state, notifier.as_ref(), generation, &e);
                            break;
                        }
                    }
                }
            }
        }
    });

    TaskHandle::new(shutdown_tx, join)
}

fn stale(state: &Arc<Mutex<WorkflowState>>, generation: u64) -> bool {
    let state = state.lock().unwrap_or_else(|e| e.into_inner());
    state.generation != generation
}
