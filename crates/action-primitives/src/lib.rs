//! Page collaborator port for JobPilot
//!
//! This crate defines the seam between the application workflow and whatever
//! browser engine drives the real page:
//! - `PagePort`: the async operations the workflow needs (query, click, fill, wait)
//! - `ElementHandle`: a snapshot of one element and its attributes
//! - `ScriptedPage`: a deterministic multi-stage page used by tests and rehearsals

pub mod errors;
pub mod fixture;
pub mod port;
pub mod selector;
pub mod types;

pub use errors::*;
pub use fixture::*;
pub use port::*;
pub use selector::SelectorList;
pub use types::*;
