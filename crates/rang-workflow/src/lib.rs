//! Rang Workflow Library
//!
//! The client-side colorization lifecycle: upload intake, the
//! upload → processing → complete state machine, status polling with
//! structural cancellation, the simulated progress animation, and result
//! presentation (comparison, download, share).

pub mod engine;
pub mod intake;
pub mod notify;
pub mod poller;
pub mod present;
pub mod progress;
pub mod state;
pub mod task;

// Re-export commonly used types
pub use engine::{ColorizeWorkflow, WorkflowSettings};
pub use intake::{AcceptedUpload, UploadIntake};
pub use notify::{Notice, Notifier, TracingNotifier};
pub use present::{ComparisonView, LinkOnlySink, SharePayload, ShareSink};
pub use state::{Phase, Stage, WorkflowSnapshot, WorkflowState};
pub use task::TaskHandle;
