use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::UserIdentity;

/// Maximum accepted feedback length, matching the input cap in the UI.
pub const MAX_FEEDBACK_LEN: usize = 500;

/// A feedback submission written to the hosted feedback table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub user_id: Uuid,
    pub email: String,
    pub comments: String,
}

impl FeedbackEntry {
    /// Build a validated entry: comments must be non-blank after trimming
    /// and no longer than [`MAX_FEEDBACK_LEN`] characters.
    pub fn new(user: &UserIdentity, comments: &str) -> Result<Self, AppError> {
        let trimmed = comments.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput(
                "Feedback must not be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > MAX_FEEDBACK_LEN {
            return Err(AppError::InvalidInput(format!(
                "Feedback must be at most {} characters",
                MAX_FEEDBACK_LEN
            )));
        }
        Ok(Self {
            user_id: user.id,
            email: user.email.clone(),
            comments: trimmed.to_string(),
        })
    }
}
