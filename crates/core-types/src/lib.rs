//! Shared primitives for the JobPilot application workflow
//!
//! Every crate in the workspace speaks in terms of these types:
//! - [`JobRecord`]: one observed or attempted application, append-only
//! - [`ApplicationStatus`]: the tagged terminal outcome of an attempt
//! - [`JobPosting`]: the parameters an agent supplies when saving a listing

pub mod errors;
pub mod record;
pub mod status;

pub use errors::CoreError;
pub use record::{JobPosting, JobRecord, UNKNOWN_COMPANY, UNKNOWN_TITLE};
pub use status::{fit, truncate_message, ApplicationStatus, MAX_ERROR_MESSAGE_CHARS};
