//! Workflow engine
//!
//! `ColorizeWorkflow` owns the client-side lifecycle of a colorization:
//! intake validation, submission through the backend seam, the simulated
//! progress animation, status polling for queued requests, and reset. At
//! most one request is in flight per engine; every submission is tagged
//! with a generation so results arriving after a reset (or a newer
//! submission) are discarded instead of clobbering fresh state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rang_core::models::{ImageRef, UploadCandidate};
use rang_core::{AppError, ColorizeBackend, Config, SessionProvider, SubmitOutcome};

use crate::intake::{AcceptedUpload, UploadIntake};
use crate::notify::{Notice, Notifier};
use crate::poller::spawn_poller;
use crate::progress::spawn_simulator;
use crate::state::{Phase, Stage, WorkflowSnapshot, WorkflowState};
use crate::task::TaskHandle;

/// Timer periods and thresholds for a workflow instance.
#[derive(Clone, Debug)]
pub struct WorkflowSettings {
    pub poll_interval: Duration,
    pub progress_tick: Duration,
    pub slow_processing_after: Duration,
}

impl WorkflowSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            progress_tick: Duration::from_millis(config.progress_tick_ms),
            slow_processing_after: Duration::from_secs(config.slow_processing_after_secs),
        }
    }
}

#[derive(Default)]
struct ActiveTasks {
    poller: Option<TaskHandle>,
    simulator: Option<TaskHandle>,
}

impl ActiveTasks {
    /// Stop and drop both tasks. Dropping aborts, so cancellation does not
    /// depend on the tasks reaching their shutdown channel.
    fn cancel(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
        if let Some(simulator) = self.simulator.take() {
            simulator.stop();
        }
    }
}

/// The processing workflow state machine.
pub struct ColorizeWorkflow {
    state: Arc<Mutex<WorkflowState>>,
    backend: Arc<dyn ColorizeBackend>,
    session: Arc<dyn SessionProvider>,
    notifier: Arc<dyn Notifier>,
    intake: UploadIntake,
    settings: WorkflowSettings,
    tasks: Mutex<ActiveTasks>,
}

impl ColorizeWorkflow {
    pub fn new(
        backend: Arc<dyn ColorizeBackend>,
        session: Arc<dyn SessionProvider>,
        notifier: Arc<dyn Notifier>,
        config: &Config,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(WorkflowState::new())),
            backend,
            session,
            notifier,
            intake: UploadIntake::from_config(config),
            settings: WorkflowSettings::from_config(config),
            tasks: Mutex::new(ActiveTasks::default()),
        }
    }

    pub fn intake(&self) -> &UploadIntake {
        &self.intake
    }

    /// Validate and submit a local file.
    pub async fn submit_path(&self, path: &std::path::Path) -> Result<(), AppError> {
        let accepted = self.intake.accept_path(path)?;
        self.submit(accepted).await
    }

    /// Validate and submit an in-memory candidate.
    pub async fn submit_candidate(&self, candidate: UploadCandidate) -> Result<(), AppError> {
        let accepted = self.intake.accept(candidate)?;
        self.submit(accepted).await
    }

    /// Submit an already-validated upload. Enters the processing phase,
    /// starts the progress animation, and either finishes synchronously
    /// (inline result) or starts polling (queued result).
    ///
    /// Returns the submission error as well as reporting it through the
    /// notifier; validation errors never change the phase.
    pub async fn submit(&self, accepted: AcceptedUpload) -> Result<(), AppError> {
        let AcceptedUpload { candidate, preview } = accepted;

        let generation = {
            let mut state = self.lock_state();
            if state.phase == Phase::Processing {
                return Err(AppError::InvalidInput(
                    "A photo is already being processed".to_string(),
                ));
            }
            state.begin_processing(preview)
        };

        tracing::info!(
            generation,
            filename = %candidate.filename,
            size = candidate.size(),
            "Submitting photo for colorization"
        );

        {
            let mut tasks = self.lock_tasks();
            tasks.cancel();
            tasks.simulator = Some(spawn_simulator(
                self.state.clone(),
                generation,
                self.settings.progress_tick,
            ));
        }

        let identity = self.session.current_user();
        let outcome = self
            .backend
            .submit(&candidate, identity.as_ref())
            .await;

        match outcome {
            Ok(SubmitOutcome::Inline(colorized)) => {
                apply_complete(&self.state, self.notifier.as_ref(), generation, colorized);
                Ok(())
            }
            Ok(SubmitOutcome::Queued { request_id, .. }) => {
                tracing::info!(generation, request_id = %request_id, "Polling for result");
                let poller = spawn_poller(
                    self.backend.clone(),
                    request_id,
                    self.settings.poll_interval,
                    generation,
                    self.state.clone(),
                    self.notifier.clone(),
                );
                self.lock_tasks().poller = Some(poller);
                Ok(())
            }
            Err(e) => {
                apply_failure(&self.state, self.notifier.as_ref(), generation, &e);
                Err(e)
            }
        }
    }

    /// "New photo": cancel any active polling and animation, clear both
    /// image references, and return to the upload phase. Safe from any
    /// state; in-flight responses from before the reset are discarded.
    pub fn reset(&self) {
        self.lock_tasks().cancel();
        let mut state = self.lock_state();
        state.generation += 1;
        state.reset_to_upload();
        tracing::info!(generation = state.generation, "Workflow reset");
    }

    /// Current state for presentation.
    pub fn snapshot(&self) -> WorkflowSnapshot {
        let state = self.lock_state();
        let elapsed_secs = state.elapsed_secs();
        let slow_processing = state.phase == Phase::Processing
            && state.stage == Stage::Colorizing
            && elapsed_secs
                .map(|secs| secs >= self.settings.slow_processing_after.as_secs())
                .unwrap_or(false);
        WorkflowSnapshot {
            phase: state.phase,
            stage: state.stage,
            progress: state.progress(),
            original_image: state.original_image.clone(),
            colorized_image: state.colorized_image.clone(),
            elapsed_secs,
            slow_processing,
        }
    }

    /// Wait until the workflow leaves the processing phase, checking every
    /// `check_every`. Used by callers without their own event loop.
    pub async fn wait_until_settled(&self, check_every: Duration) -> WorkflowSnapshot {
        loop {
            let snapshot = self.snapshot();
            if snapshot.phase != Phase::Processing {
                return snapshot;
            }
            tokio::time::sleep(check_every).await;
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, ActiveTasks> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for ColorizeWorkflow {
    fn drop(&mut self) {
        self.lock_tasks().cancel();
    }
}

/// Apply a successful result if the workflow is still on `generation`.
/// Emits the success notification exactly once. Returns whether the result
/// was applied.
pub(crate) fn apply_complete(
    state: &Arc<Mutex<WorkflowState>>,
    notifier: &dyn Notifier,
    generation: u64,
    colorized: ImageRef,
) -> bool {
    {
        let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
        if state.generation != generation {
            tracing::debug!(generation, "Discarding stale completion");
            return false;
        }
        state.complete(colorized);
    }
    tracing::info!(generation, "Colorization complete");
    notifier.notify(Notice::success(
        "Colorization Complete!",
        "Your photo has been successfully colorized.",
    ));
    true
}

/// Apply a failure if the workflow is still on `generation`: one failure
/// notification, state back to the upload phase. Returns whether the
/// failure was applied.
pub(crate) fn apply_failure(
    state: &Arc<Mutex<WorkflowState>>,
    notifier: &dyn Notifier,
    generation: u64,
    error: &AppError,
) -> bool {
    {
        let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
        if state.generation != generation {
            tracing::debug!(generation, error = %error, "Discarding stale failure");
            return false;
        }
        state.reset_to_upload();
    }
    tracing::warn!(generation, error = %error, error_type = error.error_type(), "Colorization failed");
    notifier.notify(Notice::failure("Colorization Failed", error.user_message()));
    true
}
