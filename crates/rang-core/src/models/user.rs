use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the logged-in user, attached to submissions for
/// attribution. Produced by the session provider; the workflow never
/// authenticates anyone itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: Uuid,
    pub email: String,
}

impl UserIdentity {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}
