//! Element locator for the Easy Apply flow
//!
//! Controls are found through a declarative rule table. Each rule is an ordered
//! list of matchers tried until one hits:
//! - Structural selector (attribute/class query, no page scan)
//! - Visible-text substring (case-insensitive)
//! - ARIA-label substring (case-insensitive)
//! - Custom data-attribute marker
//!
//! First hit wins; there is no scoring. A miss is a normal outcome (`Ok(None)`).

pub mod errors;
pub mod resolver;
pub mod rules;
pub mod strategies;
pub mod types;

pub use errors::*;
pub use resolver::*;
pub use rules::*;
pub use types::*;
