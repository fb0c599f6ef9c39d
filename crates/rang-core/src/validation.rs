//! Upload validation rules
//!
//! All checks run client-side before any network call. Type and size
//! violations produce distinct messages so the UI can tell the user exactly
//! why a file was rejected.

use crate::error::AppError;
use crate::models::UploadCandidate;

/// Normalize a MIME type by stripping parameters (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Validate content type against the allowlist. Compares the normalized
/// MIME type only (no parameter bypass).
pub fn validate_content_type(content_type: &str, allowed_types: &[String]) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type).to_lowercase();
    if !allowed_types.iter().any(|ct| normalized == ct.to_lowercase()) {
        return Err(AppError::InvalidInput(format!(
            "Invalid file type '{}'. Allowed types: {}",
            content_type,
            allowed_types.join(", ")
        )));
    }
    Ok(())
}

/// Validate file size against the ceiling.
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Validate file extension against the allowlist. Returns the lowercased extension.
pub fn validate_file_extension(
    filename: &str,
    allowed_extensions: &[String],
) -> Result<String, AppError> {
    let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    if extension.is_empty() || extension == filename.to_lowercase() {
        return Err(AppError::InvalidInput(
            "File must have an extension".to_string(),
        ));
    }

    if !allowed_extensions.contains(&extension) {
        return Err(AppError::InvalidInput(format!(
            "Invalid file extension '.{}'. Allowed extensions: {}",
            extension,
            allowed_extensions.join(", ")
        )));
    }

    Ok(extension)
}

/// Expected content types for an image extension. Used both to cross-check
/// declared types and to derive a type when reading from a local path.
pub fn content_types_for_extension(extension: &str) -> Option<&'static [&'static str]> {
    match extension {
        "jpg" | "jpeg" => Some(&["image/jpeg", "image/jpg"]),
        "png" => Some(&["image/png"]),
        "gif" => Some(&["image/gif"]),
        "webp" => Some(&["image/webp"]),
        "bmp" => Some(&["image/bmp"]),
        "tif" | "tiff" => Some(&["image/tiff"]),
        "svg" => Some(&["image/svg+xml"]),
        _ => None,
    }
}

/// Validate that the declared Content-Type matches the file extension.
/// Prevents spoofing where a non-image payload is declared with an image
/// type or renamed with an image extension.
pub fn validate_extension_content_type_match(
    filename: &str,
    content_type: &str,
) -> Result<(), AppError> {
    let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    let normalized = normalize_mime_type(content_type).to_lowercase();

    let expected = match content_types_for_extension(&extension) {
        Some(expected) => expected,
        None => {
            // Unknown extensions are rejected by the extension allowlist;
            // nothing to cross-check here.
            return Ok(());
        }
    };

    if !expected.iter().any(|ct| normalized == *ct) {
        return Err(AppError::InvalidInput(format!(
            "Invalid file type: Content-Type '{}' does not match extension '.{}'. Expected one of: {}",
            content_type,
            extension,
            expected.join(", ")
        )));
    }

    Ok(())
}

/// Sanitize a filename to prevent path traversal and invalid characters.
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    const MAX_FILENAME_LENGTH: usize = 255;

    let path = std::path::Path::new(filename);
    let filename_only = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    if filename_only.contains("..") {
        return Err(AppError::InvalidInput(
            "Filename contains invalid path traversal".to_string(),
        ));
    }

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim().is_empty() || sanitized.len() < 3 {
        return Ok("file".to_string());
    }

    Ok(sanitized)
}

/// Run all intake checks on a candidate: size, content type, extension,
/// and the extension/content-type cross-check.
pub fn validate_candidate(
    candidate: &UploadCandidate,
    max_size: usize,
    allowed_extensions: &[String],
    allowed_content_types: &[String],
) -> Result<(), AppError> {
    validate_file_size(candidate.size(), max_size)?;
    validate_content_type(&candidate.content_type, allowed_content_types)?;
    validate_file_extension(&candidate.filename, allowed_extensions)?;
    validate_extension_content_type_match(&candidate.filename, &candidate.content_type)?;
    Ok(())
}
