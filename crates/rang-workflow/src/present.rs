//! Result presentation
//!
//! Operations on a finished colorization: the comparison/single-view
//! toggle, saving the colorized image under a timestamped filename, and
//! best-effort sharing. Download and share failures never touch the
//! workflow state; the user can simply retry them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;

use rang_core::models::ImageRef;
use rang_core::{AppError, ColorizeBackend};

/// Presentation state for the finished view: side-by-side comparison or
/// the colorized image alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonView {
    show_comparison: bool,
}

impl ComparisonView {
    pub fn new() -> Self {
        Self {
            show_comparison: true,
        }
    }

    pub fn toggle(&mut self) {
        self.show_comparison = !self.show_comparison;
    }

    pub fn is_comparison(&self) -> bool {
        self.show_comparison
    }
}

impl Default for ComparisonView {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve an image reference to raw bytes: remote references are fetched
/// through the backend, inline and local references are read directly.
pub async fn resolve_bytes(
    backend: &dyn ColorizeBackend,
    image: &ImageRef,
) -> Result<Bytes, AppError> {
    match image {
        ImageRef::Remote(url) => backend.fetch(url).await,
        ImageRef::Inline { bytes, .. } => Ok(bytes.clone()),
        ImageRef::Local(path) => Ok(Bytes::from(std::fs::read(path)?)),
    }
}

/// Timestamped filename for a saved result, e.g. `rang-20260806-143057.jpg`.
pub fn download_filename(now: chrono::DateTime<Utc>) -> String {
    format!("rang-{}.jpg", now.format("%Y%m%d-%H%M%S"))
}

/// Save the colorized image into `dir` under a timestamped name and return
/// the written path.
pub async fn download(
    backend: &dyn ColorizeBackend,
    image: &ImageRef,
    dir: &Path,
) -> Result<PathBuf, AppError> {
    let bytes = resolve_bytes(backend, image).await?;
    let path = dir.join(download_filename(Utc::now()));
    std::fs::write(&path, &bytes)?;
    tracing::info!(path = %path.display(), size = bytes.len(), "Saved colorized photo");
    Ok(path)
}

/// What gets handed to a share target.
#[derive(Debug, Clone)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub link: String,
    pub filename: String,
    pub bytes: Bytes,
}

/// A destination capable of sharing a colorized photo (native share sheet,
/// clipboard, ...). Implementations decide what to do with the payload.
pub trait ShareSink: Send + Sync {
    fn share(&self, payload: SharePayload) -> Result<(), AppError>;
}

/// Fallback sink used when no native share capability exists: surfaces the
/// share link only, leaving the image bytes untouched.
pub struct LinkOnlySink;

impl ShareSink for LinkOnlySink {
    fn share(&self, payload: SharePayload) -> Result<(), AppError> {
        tracing::info!(link = %payload.link, "Share link ready");
        println!("{}", payload.link);
        Ok(())
    }
}

/// Share the colorized image through `sink`. Best-effort: every failure is
/// logged and swallowed, never propagated to the workflow.
pub async fn share(
    backend: &dyn ColorizeBackend,
    image: &ImageRef,
    link: &str,
    sink: Arc<dyn ShareSink>,
) {
    let bytes = match resolve_bytes(backend, image).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Share failed: could not resolve image bytes");
            return;
        }
    };

    let payload = SharePayload {
        title: "Rang".to_string(),
        text: "See what Rang did to my memory - try it too!".to_string(),
        link: link.to_string(),
        filename: "rang-memory.jpg".to_string(),
        bytes,
    };

    if let Err(e) = sink.share(payload) {
        tracing::warn!(error = %e, "Share failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn toggle_flips_comparison() {
        let mut view = ComparisonView::new();
        assert!(view.is_comparison());
        view.toggle();
        assert!(!view.is_comparison());
        view.toggle();
        assert!(view.is_comparison());
    }

    #[test]
    fn download_filename_is_timestamped() {
        let at = Utc.with_ymd_and_hms(2026, 8, 6, 14, 30, 57).unwrap();
        assert_eq!(download_filename(at), "rang-20260806-143057.jpg");
    }
}
