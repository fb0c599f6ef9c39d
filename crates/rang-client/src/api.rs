//! Domain methods for the colorization API.
//!
//! Response types live in `rang_core::models`; this module maps them onto
//! the service endpoints and implements the `ColorizeBackend` seam the
//! workflow engine drives.

use async_trait::async_trait;
use bytes::Bytes;

use rang_core::models::{
    ColorizeResponse, ColorizeStatus, EphemeralResponse, FeedbackEntry, ImageRef, StatsSnapshot,
    UploadCandidate, UserIdentity,
};
use rang_core::{AppError, ColorizeBackend, SubmitOutcome};

use crate::ApiClient;

fn file_part(candidate: &UploadCandidate) -> Result<reqwest::multipart::Part, AppError> {
    reqwest::multipart::Part::bytes(candidate.data.clone())
        .file_name(candidate.filename.clone())
        .mime_str(&candidate.content_type)
        .map_err(|e| AppError::InvalidInput(format!("Invalid content type: {}", e)))
}

impl ApiClient {
    /// Submit an image for persistent colorization. The service stores the
    /// job under a request id which must then be polled. Requires a user
    /// identity for attribution.
    pub async fn colorize_upload(
        &self,
        candidate: &UploadCandidate,
        identity: &UserIdentity,
    ) -> Result<ColorizeResponse, AppError> {
        let form = reqwest::multipart::Form::new()
            .part("file", file_part(candidate)?)
            .text("user_id", identity.id.to_string())
            .text("user_email", identity.email.clone());

        self.post_multipart("/colorize/upload", form).await
    }

    /// Submit an image for ephemeral colorization: the result comes back
    /// inline as base64 and nothing is persisted server-side. No identity
    /// is attached.
    pub async fn colorize_ephemeral(
        &self,
        candidate: &UploadCandidate,
    ) -> Result<EphemeralResponse, AppError> {
        let form = reqwest::multipart::Form::new().part("file", file_part(candidate)?);
        self.post_multipart("/colorize/ephemeral", form).await
    }

    /// Fetch the status of a queued colorization request.
    pub async fn colorize_status(&self, request_id: &str) -> Result<ColorizeResponse, AppError> {
        self.get(&format!("/colorize/status/{}", request_id)).await
    }

    /// Fetch aggregate usage counters.
    pub async fn stats(&self) -> Result<StatsSnapshot, AppError> {
        self.get("/api/v1/stats/").await
    }

    /// Fetch stats, substituting the fixed fallback on any failure. The
    /// endpoint is cosmetic, so callers never see an error from it.
    pub async fn stats_or_fallback(&self) -> StatsSnapshot {
        match self.stats().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch stats, using fallback values");
                StatsSnapshot::fallback()
            }
        }
    }

    /// Submit a feedback entry to the hosted feedback table.
    pub async fn submit_feedback(&self, entry: &FeedbackEntry) -> Result<(), AppError> {
        self.post_json("/api/v1/feedback/", entry).await
    }
}

#[async_trait]
impl ColorizeBackend for ApiClient {
    async fn submit(
        &self,
        candidate: &UploadCandidate,
        identity: Option<&UserIdentity>,
    ) -> Result<SubmitOutcome, AppError> {
        match identity {
            Some(identity) => {
                let response = self.colorize_upload(candidate, identity).await?;
                tracing::info!(
                    request_id = %response.request_id,
                    status = %response.status,
                    "Colorization request submitted"
                );
                match response.status {
                    ColorizeStatus::Failed => Err(AppError::ServiceFailed(
                        response
                            .error_message
                            .unwrap_or_else(|| "Colorization failed".to_string()),
                    )),
                    ColorizeStatus::Complete => match response.colorized_url {
                        Some(url) => Ok(SubmitOutcome::Inline(ImageRef::Remote(url))),
                        None => Err(AppError::MalformedResponse(
                            "Complete response missing colorized_url".to_string(),
                        )),
                    },
                    ColorizeStatus::Processing => Ok(SubmitOutcome::Queued {
                        request_id: response.request_id,
                        original_url: response.original_url,
                    }),
                }
            }
            None => {
                let response = self.colorize_ephemeral(candidate).await?;
                tracing::info!(
                    payload_len = response.colorized_base64.len(),
                    "Ephemeral colorization returned inline payload"
                );
                Ok(SubmitOutcome::Inline(response.decode()?))
            }
        }
    }

    async fn status(&self, request_id: &str) -> Result<ColorizeResponse, AppError> {
        self.colorize_status(request_id).await
    }

    async fn fetch(&self, url: &str) -> Result<Bytes, AppError> {
        self.get_bytes(url).await
    }
}
