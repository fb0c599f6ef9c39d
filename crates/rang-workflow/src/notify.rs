//! User notification seam
//!
//! The engine reports terminal outcomes through [`Notifier`]; what a
//! notification looks like (toast, console line, log event) is the host's
//! concern. Exactly one notice is emitted per terminal transition.

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success { title: String, detail: String },
    Failure { title: String, detail: String },
}

impl Notice {
    pub fn success(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Notice::Success {
            title: title.into(),
            detail: detail.into(),
        }
    }

    pub fn failure(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Notice::Failure {
            title: title.into(),
            detail: detail.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Default notifier: structured log events only.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Success { title, detail } => {
                tracing::info!(title = %title, detail = %detail, "notification");
            }
            Notice::Failure { title, detail } => {
                tracing::warn!(title = %title, detail = %detail, "notification");
            }
        }
    }
}
