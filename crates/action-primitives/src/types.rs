//! Core data types for page interaction

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Snapshot of one element on the live page.
///
/// A handle is only meaningful for the page state it was read from; clicking a
/// handle after the page re-rendered may fail with `PageError::Detached`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Engine-specific node reference
    pub node_id: String,

    /// Lowercase tag name
    pub tag: String,

    /// Visible text content
    #[serde(default)]
    pub text: String,

    /// Attributes including `class`, `aria-label` and data attributes
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ElementHandle {
    pub fn new(node_id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            tag: tag.into().to_ascii_lowercase(),
            text: String::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn class_list(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_list().any(|c| c == class)
    }

    pub fn aria_label(&self) -> Option<&str> {
        self.attribute("aria-label")
    }

    pub fn visible_text(&self) -> &str {
        self.text.trim()
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} #{}>", self.tag, self.node_id)
    }
}

/// Page load states a caller can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    /// DOMContentLoaded fired
    DomContentLoaded,

    /// Load event fired
    Load,

    /// No network activity for a quiet window
    NetworkIdle,
}

impl Default for LoadState {
    fn default() -> Self {
        LoadState::Load
    }
}

impl LoadState {
    pub fn name(&self) -> &'static str {
        match self {
            LoadState::DomContentLoaded => "domcontentloaded",
            LoadState::Load => "load",
            LoadState::NetworkIdle => "networkidle",
        }
    }
}
