use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;

/// Status of a colorization request held by the service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColorizeStatus {
    Processing,
    Complete,
    Failed,
}

impl ColorizeStatus {
    /// Terminal statuses stop polling.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ColorizeStatus::Complete | ColorizeStatus::Failed)
    }
}

impl Display for ColorizeStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ColorizeStatus::Processing => write!(f, "processing"),
            ColorizeStatus::Complete => write!(f, "complete"),
            ColorizeStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ColorizeStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(ColorizeStatus::Processing),
            "complete" => Ok(ColorizeStatus::Complete),
            "failed" => Ok(ColorizeStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid colorize status: {}", s)),
        }
    }
}

/// Response for submission and status endpoints (queued path).
///
/// `colorized_url` is present only when `status` is `complete`;
/// `error_message` only when `failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorizeResponse {
    pub request_id: String,
    pub status: ColorizeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colorized_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Response for the ephemeral (in-memory) colorization endpoint.
///
/// The service returns the result inline without persisting it; the payload
/// is a base64-encoded JPEG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EphemeralResponse {
    pub colorized_base64: String,
}

impl EphemeralResponse {
    /// Decode the inline payload into a renderable image reference.
    pub fn decode(&self) -> Result<ImageRef, AppError> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(&self.colorized_base64)?;
        if bytes.is_empty() {
            return Err(AppError::MalformedResponse(
                "Ephemeral response contained an empty image payload".to_string(),
            ));
        }
        Ok(ImageRef::Inline {
            bytes: Bytes::from(bytes),
            content_type: "image/jpeg".to_string(),
        })
    }
}

/// A displayable image reference.
///
/// `Remote` points at a service-held result, `Inline` carries bytes decoded
/// from an ephemeral response, `Local` is a file on disk (the original
/// photo's preview).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    Remote(String),
    Inline { bytes: Bytes, content_type: String },
    Local(PathBuf),
}

impl ImageRef {
    pub fn is_remote(&self) -> bool {
        matches!(self, ImageRef::Remote(_))
    }

    /// Short description for logging; never the full inline payload.
    pub fn describe(&self) -> String {
        match self {
            ImageRef::Remote(url) => url.clone(),
            ImageRef::Inline { bytes, content_type } => {
                format!("inline {} ({} bytes)", content_type, bytes.len())
            }
            ImageRef::Local(path) => path.display().to_string(),
        }
    }
}
