//! Data models for the colorization workflow
//!
//! Wire types for the colorization API, transient upload candidates, and
//! the small surrounding domain (identity, stats, feedback). Nothing here
//! is persisted; every value lives for at most one workflow session.

mod colorize;
mod feedback;
mod stats;
mod upload;
mod user;

pub use colorize::*;
pub use feedback::*;
pub use stats::*;
pub use upload::*;
pub use user::*;
