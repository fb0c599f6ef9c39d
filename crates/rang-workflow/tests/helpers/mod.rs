//! Shared test doubles for workflow tests: a scripted backend and a
//! recording notifier.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use rang_core::models::{
    ColorizeResponse, ColorizeStatus, ImageRef, UploadCandidate, UserIdentity,
};
use rang_core::{AppError, ColorizeBackend, Config, SubmitOutcome};
use rang_workflow::{Notice, Notifier};

/// What the scripted backend does on submit.
pub enum SubmitScript {
    /// Resolve synchronously with an inline result.
    Inline(ImageRef),
    /// Return a pollable request id.
    Queued(String),
    /// Fail with a transport error.
    NetworkError,
    /// Wait, then resolve inline (for racing against reset).
    DelayedInline(Duration, ImageRef),
}

pub struct ScriptedBackend {
    submit_script: SubmitScript,
    statuses: Mutex<VecDeque<ColorizeResponse>>,
    pub submit_calls: AtomicUsize,
    pub poll_calls: AtomicUsize,
    pub fetch_body: Bytes,
}

impl ScriptedBackend {
    pub fn new(submit_script: SubmitScript) -> Self {
        Self {
            submit_script,
            statuses: Mutex::new(VecDeque::new()),
            submit_calls: AtomicUsize::new(0),
            poll_calls: AtomicUsize::new(0),
            fetch_body: Bytes::from_static(b"\xff\xd8\xffcolorized-jpeg"),
        }
    }

    /// Queue the given status responses; once exhausted, every further
    /// poll sees `processing`.
    pub fn with_statuses(self, statuses: Vec<ColorizeResponse>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into();
        self
    }

    pub fn submit_count(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn poll_count(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ColorizeBackend for ScriptedBackend {
    async fn submit(
        &self,
        _candidate: &UploadCandidate,
        _identity: Option<&UserIdentity>,
    ) -> Result<SubmitOutcome, AppError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        match &self.submit_script {
            SubmitScript::Inline(image) => Ok(SubmitOutcome::Inline(image.clone())),
            SubmitScript::Queued(request_id) => Ok(SubmitOutcome::Queued {
                request_id: request_id.clone(),
                original_url: None,
            }),
            SubmitScript::NetworkError => {
                Err(AppError::Network("connection refused".to_string()))
            }
            SubmitScript::DelayedInline(delay, image) => {
                tokio::time::sleep(*delay).await;
                Ok(SubmitOutcome::Inline(image.clone()))
            }
        }
    }

    async fn status(&self, request_id: &str) -> Result<ColorizeResponse, AppError> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.statuses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| processing_response(request_id)))
    }

    async fn fetch(&self, _url: &str) -> Result<Bytes, AppError> {
        Ok(self.fetch_body.clone())
    }
}

pub fn processing_response(request_id: &str) -> ColorizeResponse {
    ColorizeResponse {
        request_id: request_id.to_string(),
        status: ColorizeStatus::Processing,
        original_url: None,
        colorized_url: None,
        error_message: None,
    }
}

pub fn complete_response(request_id: &str, colorized_url: &str) -> ColorizeResponse {
    ColorizeResponse {
        request_id: request_id.to_string(),
        status: ColorizeStatus::Complete,
        original_url: Some("https://cdn.example.com/original.jpg".to_string()),
        colorized_url: Some(colorized_url.to_string()),
        error_message: None,
    }
}

pub fn failed_response(request_id: &str, message: &str) -> ColorizeResponse {
    ColorizeResponse {
        request_id: request_id.to_string(),
        status: ColorizeStatus::Failed,
        original_url: None,
        colorized_url: None,
        error_message: Some(message.to_string()),
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn successes(&self) -> usize {
        self.notices()
            .iter()
            .filter(|n| matches!(n, Notice::Success { .. }))
            .count()
    }

    pub fn failures(&self) -> usize {
        self.notices()
            .iter()
            .filter(|n| matches!(n, Notice::Failure { .. }))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// Config with timers short enough for tests.
pub fn fast_config() -> Config {
    Config {
        poll_interval_ms: 20,
        progress_tick_ms: 5,
        ..Config::default()
    }
}

pub fn jpeg_candidate(size: usize) -> UploadCandidate {
    UploadCandidate::new(vec![0u8; size], "memory.jpg", "image/jpeg")
}
