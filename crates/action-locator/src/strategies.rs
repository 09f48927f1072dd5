//! Element-level matching for the scan strategies
//!
//! Structural matchers are answered by the page itself; the other three are
//! evaluated here against element snapshots, so each can be tested alone.

use action_primitives::ElementHandle;

use crate::types::Matcher;

impl Matcher {
    /// Whether `element` satisfies this matcher.
    ///
    /// Always `false` for structural matchers, which need the page.
    pub fn matches_element(&self, element: &ElementHandle) -> bool {
        match self {
            Matcher::Structural(_) => false,
            Matcher::Text(needle) => contains_ignore_case(element.visible_text(), needle),
            Matcher::AriaLabel(needle) => element
                .aria_label()
                .map(|label| contains_ignore_case(label, needle))
                .unwrap_or(false),
            Matcher::DataMarker(attribute) => element.has_attribute(attribute),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_matcher_is_case_insensitive() {
        let el = ElementHandle::new("n", "button").with_text("  NEXT ");
        assert!(Matcher::Text("next").matches_element(&el));
        assert!(!Matcher::Text("review").matches_element(&el));
    }

    #[test]
    fn test_aria_matcher() {
        let el = ElementHandle::new("n", "button")
            .with_attribute("aria-label", "Continue to next step");
        assert!(Matcher::AriaLabel("continue to next step").matches_element(&el));
        assert!(!Matcher::Text("continue").matches_element(&el));

        let bare = ElementHandle::new("b", "button");
        assert!(!Matcher::AriaLabel("continue").matches_element(&bare));
    }

    #[test]
    fn test_data_marker_matcher() {
        let el = ElementHandle::new("r", "button")
            .with_attribute("data-live-test-easy-apply-review-button", "");
        let marker = Matcher::DataMarker("data-live-test-easy-apply-review-button");
        assert!(marker.matches_element(&el));
        assert!(!Matcher::DataMarker("data-easy-apply-next-button").matches_element(&el));
    }

    #[test]
    fn test_structural_never_matches_snapshot() {
        let el = ElementHandle::new("a", "button").with_attribute("class", "jobs-apply-button");
        assert!(!Matcher::Structural("button.jobs-apply-button").matches_element(&el));
    }
}
