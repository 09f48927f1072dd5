//! Easy Apply flow orchestration
//!
//! This crate turns an open job posting into exactly one recorded outcome:
//! the quick-apply detector finds the entry control, and the application
//! driver walks the dialog (review, submit, confirmation) as a state machine.

pub mod detector;
pub mod driver;
pub mod errors;
pub mod types;

pub use detector::{Detection, HandleSlot, QuickApplyDetector, QuickApplyHandle};
pub use driver::ApplicationDriver;
pub use errors::FlowError;
pub use types::{ApplicationReport, ApplyState, DriverSettings};
