//! Error types module
//!
//! All errors in the colorization workflow are unified under the `AppError`
//! enum: client-side validation failures, transport and HTTP errors from the
//! remote service, service-reported colorization failures, and internal
//! errors. Callers use `is_recoverable` to decide whether an operation is
//! worth retrying and `user_message` for the text surfaced in notifications.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Colorization failed: {0}")]
    ServiceFailed(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(format!("JSON parsing error: {}", err))
    }
}

impl From<base64::DecodeError> for AppError {
    fn from(err: base64::DecodeError) -> Self {
        AppError::MalformedResponse(format!("Base64 decoding error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

impl AppError {
    /// Whether retrying the same operation could succeed.
    ///
    /// Transport failures and server-side errors (5xx) are transient;
    /// validation failures and service-reported colorization failures
    /// are not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Network(_) => true,
            AppError::Api { status, .. } => *status >= 500,
            AppError::Internal(_) => true,
            AppError::InvalidInput(_)
            | AppError::PayloadTooLarge(_)
            | AppError::MalformedResponse(_)
            | AppError::ServiceFailed(_)
            | AppError::Unauthorized(_) => false,
        }
    }

    /// Error type name for structured logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Network(_) => "Network",
            AppError::Api { .. } => "Api",
            AppError::MalformedResponse(_) => "MalformedResponse",
            AppError::ServiceFailed(_) => "ServiceFailed",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Client-facing message (may differ from the internal error message).
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Network(_) => {
                "Could not reach the colorization service. Check your connection and try again."
                    .to_string()
            }
            AppError::Api { .. } => "The colorization service returned an error.".to_string(),
            AppError::MalformedResponse(_) => {
                "The colorization service returned an unexpected response.".to_string()
            }
            AppError::ServiceFailed(msg) => msg.clone(),
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::Internal(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_are_recoverable() {
        let err = AppError::Network("connection refused".to_string());
        assert!(err.is_recoverable());
        assert_eq!(err.error_type(), "Network");
    }

    #[test]
    fn server_errors_are_recoverable_client_errors_are_not() {
        let server = AppError::Api {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(server.is_recoverable());

        let client = AppError::Api {
            status: 400,
            message: "bad request".to_string(),
        };
        assert!(!client.is_recoverable());
    }

    #[test]
    fn validation_errors_are_terminal_and_verbatim() {
        let err = AppError::InvalidInput("Invalid file type".to_string());
        assert!(!err.is_recoverable());
        assert_eq!(err.user_message(), "Invalid file type");
    }

    #[test]
    fn service_failure_surfaces_service_message() {
        let err = AppError::ServiceFailed("face region could not be restored".to_string());
        assert!(!err.is_recoverable());
        assert_eq!(err.user_message(), "face region could not be restored");
    }

    #[test]
    fn internal_messages_are_hidden_from_users() {
        let err = AppError::Internal("poll task panicked".to_string());
        assert!(!err.user_message().contains("panicked"));
    }
}
