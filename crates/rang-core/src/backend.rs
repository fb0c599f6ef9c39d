//! Backend seam between the workflow and the HTTP client
//!
//! The workflow engine drives everything through [`ColorizeBackend`], never
//! through a concrete HTTP type. The `rang-client` crate implements it over
//! reqwest; tests implement it with scripted responses.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::AppError;
use crate::models::{ColorizeResponse, ImageRef, UploadCandidate, UserIdentity};

/// Result of submitting a candidate for colorization.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The service returned the colorized image inline (ephemeral path);
    /// nothing was persisted server-side and there is nothing to poll.
    Inline(ImageRef),
    /// The service accepted the job; the caller must poll the status
    /// endpoint keyed by `request_id` until it reaches a terminal status.
    Queued {
        request_id: String,
        original_url: Option<String>,
    },
}

/// Remote colorization service operations used by the workflow.
#[async_trait]
pub trait ColorizeBackend: Send + Sync {
    /// Submit a validated candidate. When an identity is available the
    /// persistent (pollable) path is used; without one the submission must
    /// still go through via the ephemeral path.
    async fn submit(
        &self,
        candidate: &UploadCandidate,
        identity: Option<&UserIdentity>,
    ) -> Result<SubmitOutcome, AppError>;

    /// Fetch the current status of a queued request.
    async fn status(&self, request_id: &str) -> Result<ColorizeResponse, AppError>;

    /// Fetch raw bytes from a service-held URL (download/share).
    async fn fetch(&self, url: &str) -> Result<Bytes, AppError>;
}
