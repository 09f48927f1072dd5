//! JobPilot library
//!
//! Agent-facing actions around the Easy Apply flow, plus the collaborators
//! the agent uses while filling forms (CV text, canned answers, login wait).

pub mod actions;
pub mod answers;
pub mod config;
pub mod cv;
pub mod errors;
pub mod login;

// Re-export commonly used types for external use
pub use actions::{catalog, ActionResult, ActionSpec, JobActions};
pub use answers::AnswerBook;
pub use config::AppConfig;
pub use cv::{CvDocument, CvError};
pub use errors::{JobPilotError, JobPilotResult};
