//! Core types for locator system

use action_primitives::ElementHandle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interactive controls of the Easy Apply flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKind {
    /// Entry button on the job posting
    EasyApply,

    /// Advance to the next form step
    Next,

    /// Open the review step of the dialog
    Review,

    /// Final submit button
    Submit,
}

impl ControlKind {
    pub fn name(&self) -> &'static str {
        match self {
            ControlKind::EasyApply => "easy-apply",
            ControlKind::Next => "next",
            ControlKind::Review => "review",
            ControlKind::Submit => "submit",
        }
    }

    pub fn all() -> [ControlKind; 4] {
        [
            ControlKind::EasyApply,
            ControlKind::Next,
            ControlKind::Review,
            ControlKind::Submit,
        ]
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Locator strategy enumeration, in fallback order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocatorStrategy {
    /// Attribute/class selector answered by the page
    Structural,

    /// Visible text substring
    Text,

    /// `aria-label` substring
    AriaLabel,

    /// Presence of a custom data attribute
    DataMarker,
}

impl LocatorStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            LocatorStrategy::Structural => "structural",
            LocatorStrategy::Text => "text",
            LocatorStrategy::AriaLabel => "aria-label",
            LocatorStrategy::DataMarker => "data-marker",
        }
    }
}

/// One entry of a rule's fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// CSS selector evaluated by the page
    Structural(&'static str),

    /// Lowercase needle searched in visible text
    Text(&'static str),

    /// Lowercase needle searched in `aria-label`
    AriaLabel(&'static str),

    /// Attribute that must be present
    DataMarker(&'static str),
}

impl Matcher {
    pub fn strategy(&self) -> LocatorStrategy {
        match self {
            Matcher::Structural(_) => LocatorStrategy::Structural,
            Matcher::Text(_) => LocatorStrategy::Text,
            Matcher::AriaLabel(_) => LocatorStrategy::AriaLabel,
            Matcher::DataMarker(_) => LocatorStrategy::DataMarker,
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, Matcher::Structural(_))
    }
}

/// Ordered matcher list for one target
#[derive(Debug, Clone, Copy)]
pub struct LocatorRule {
    pub name: &'static str,

    /// Elements scanned by the non-structural matchers
    pub scan_scope: &'static str,

    pub matchers: &'static [Matcher],
}

/// Element resolved by a rule
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedElement {
    pub element: ElementHandle,

    /// Strategy of the matcher that hit
    pub strategy: LocatorStrategy,

    /// Rule that produced the hit
    pub rule: &'static str,
}

impl LocatedElement {
    pub fn text(&self) -> &str {
        self.element.visible_text()
    }
}
