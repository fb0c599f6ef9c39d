//! Simulated progress driver
//!
//! While the remote service is working, the UI shows a progress bar that is
//! not backed by real progress information. The simulator advances it by
//! randomized increments on a fixed tick, capped below 100 so the bar can
//! never show done before the authoritative result arrives. Stages advance
//! at fixed progress thresholds.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::state::{Phase, Stage, WorkflowState};
use crate::task::TaskHandle;

/// Ceiling for simulated progress; only an authoritative completion may
/// take the bar to 100.
pub const SIMULATED_PROGRESS_CAP: u8 = 95;

/// Per-tick increment range.
pub const MIN_STEP: u8 = 5;
pub const MAX_STEP: u8 = 20;

/// Progress threshold at which each stage begins.
const COLORIZING_AT: u8 = 30;
const ENHANCING_AT: u8 = 70;

/// Advance `current` by `step`, saturating at `cap`.
pub fn advance(current: u8, step: u8, cap: u8) -> u8 {
    current.saturating_add(step).min(cap)
}

/// Stage shown for a given simulated progress value.
pub fn stage_for_progress(progress: u8) -> Stage {
    if progress < COLORIZING_AT {
        Stage::Analyzing
    } else if progress < ENHANCING_AT {
        Stage::Colorizing
    } else {
        Stage::Enhancing
    }
}

/// Spawn the simulated progress task for the given generation. The task
/// stops itself when the workflow leaves the processing phase or moves to
/// a newer generation; the returned handle cancels it on reset/teardown.
pub fn spawn_simulator(
    state: Arc<Mutex<WorkflowState>>,
    generation: u64,
    tick: Duration,
) -> TaskHandle {
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

    let join = tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick of a tokio interval fires immediately; skip it so
        // the bar starts at 0 for at least one tick period.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = interval.tick() => {
                    let step = rand::rng().random_range(MIN_STEP..=MAX_STEP);
                    let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
                    if state.generation != generation || state.phase != Phase::Processing {
                        break;
                    }
                    let next = advance(state.progress(), step, SIMULATED_PROGRESS_CAP);
                    state.raise_progress(next);
                    state.raise_stage(stage_for_progress(next));
                    tracing::debug!(progress = next, stage = %state.stage, "Simulated progress tick");
                }
            }
        }
    });

    TaskHandle::new(shutdown_tx, join)
}
