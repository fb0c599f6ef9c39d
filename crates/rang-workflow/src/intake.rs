//! Upload intake
//!
//! Validates a selected file before anything touches the network: media
//! type against the allow-list, size against the ceiling, extension and
//! the extension/content-type cross-check. Acceptance yields the validated
//! candidate together with a preview reference for immediate display;
//! rejection yields only the error and leaves the workflow untouched.

use std::path::Path;

use bytes::Bytes;
use rang_core::models::{ImageRef, UploadCandidate};
use rang_core::validation::{
    content_types_for_extension, sanitize_filename, validate_candidate,
};
use rang_core::{AppError, Config};

/// A candidate that passed intake, plus its display preview.
#[derive(Debug, Clone)]
pub struct AcceptedUpload {
    pub candidate: UploadCandidate,
    pub preview: ImageRef,
}

/// Intake rules for one workflow instance.
#[derive(Clone, Debug)]
pub struct UploadIntake {
    max_file_size_bytes: usize,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

impl UploadIntake {
    pub fn new(
        max_file_size_bytes: usize,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size_bytes,
            allowed_extensions,
            allowed_content_types,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_file_size_bytes,
            config.allowed_extensions.clone(),
            config.allowed_content_types.clone(),
        )
    }

    /// Validate an in-memory candidate (drag/drop or picker path). The
    /// preview is built from the candidate's own bytes.
    pub fn accept(&self, candidate: UploadCandidate) -> Result<AcceptedUpload, AppError> {
        self.validate(&candidate)?;
        let preview = ImageRef::Inline {
            bytes: Bytes::from(candidate.data.clone()),
            content_type: candidate.content_type.clone(),
        };
        Ok(self.accepted(candidate, preview))
    }

    /// Read and validate a local file, deriving the declared content type
    /// from the extension. The preview points at the file itself.
    pub fn accept_path(&self, path: &Path) -> Result<AcceptedUpload, AppError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid path: {}", path.display())))?
            .to_string();

        let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();
        let content_type = content_types_for_extension(&extension)
            .and_then(|types| types.first())
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "Invalid file type: '.{}' is not a supported image extension",
                    extension
                ))
            })?
            .to_string();

        let data = std::fs::read(path)
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file: {}", e)))?;

        let candidate = UploadCandidate::new(data, filename, content_type);
        self.validate(&candidate)?;
        Ok(self.accepted(candidate, ImageRef::Local(path.to_path_buf())))
    }

    fn validate(&self, candidate: &UploadCandidate) -> Result<(), AppError> {
        validate_candidate(
            candidate,
            self.max_file_size_bytes,
            &self.allowed_extensions,
            &self.allowed_content_types,
        )
    }

    fn accepted(&self, mut candidate: UploadCandidate, preview: ImageRef) -> AcceptedUpload {
        // Rejecting here would be surprising after validation passed, so a
        // degenerate name just falls back to "file".
        candidate.filename =
            sanitize_filename(&candidate.filename).unwrap_or_else(|_| "file".to_string());
        AcceptedUpload { candidate, preview }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn intake() -> UploadIntake {
        UploadIntake::from_config(&Config::default())
    }

    #[test]
    fn accepts_small_jpeg_with_inline_preview() {
        let candidate =
            UploadCandidate::new(vec![0u8; 2 * 1024 * 1024], "wedding photo.jpg", "image/jpeg");
        let accepted = intake().accept(candidate).unwrap();
        assert_eq!(accepted.candidate.filename, "wedding_photo.jpg");
        match accepted.preview {
            ImageRef::Inline { ref bytes, .. } => assert_eq!(bytes.len(), 2 * 1024 * 1024),
            ref other => panic!("expected inline preview, got {:?}", other),
        }
    }

    #[test]
    fn rejects_text_plain_declared_type() {
        let candidate = UploadCandidate::new(vec![0u8; 8], "notes.jpg", "text/plain");
        let err = intake().accept(candidate).unwrap_err();
        assert!(err.to_string().contains("Invalid file type"));
    }

    #[test]
    fn rejects_oversize_png_with_distinct_message() {
        let candidate =
            UploadCandidate::new(vec![0u8; 15 * 1024 * 1024], "big.png", "image/png");
        let err = intake().accept(candidate).unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
        assert!(err.to_string().contains("10 MB"));
    }

    #[test]
    fn accept_path_rejects_unsupported_extension() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"plain text").unwrap();
        let err = intake().accept_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid file type"));
    }

    #[test]
    fn accept_path_reads_file_and_uses_local_preview() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();
        let accepted = intake().accept_path(file.path()).unwrap();
        assert_eq!(accepted.candidate.content_type, "image/png");
        assert_eq!(accepted.candidate.size(), 4);
        assert_eq!(accepted.preview, ImageRef::Local(file.path().to_path_buf()));
    }
}
