//! Rang Core Library
//!
//! Core domain models, error types, configuration, validation, and the
//! backend/session seams shared across the rang crates.

pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod validation;

// Re-export commonly used types
pub use backend::{ColorizeBackend, SubmitOutcome};
pub use config::Config;
pub use error::AppError;
pub use session::{NoSession, SessionProvider, SharedSession, StaticSession};
