//! Rule table for the job board's known layouts
//!
//! Needles are lowercase; text and ARIA matching lowercase the element side.

use crate::types::{ControlKind, LocatorRule, Matcher};

/// Scope scanned by control fallbacks
pub const CONTROL_SCOPE: &str = "button";

pub static EASY_APPLY_RULE: LocatorRule = LocatorRule {
    name: "easy-apply",
    scan_scope: CONTROL_SCOPE,
    matchers: &[
        Matcher::Structural("button.jobs-apply-button"),
        Matcher::Text("easy apply"),
        Matcher::AriaLabel("easy apply"),
    ],
};

pub static NEXT_RULE: LocatorRule = LocatorRule {
    name: "next",
    scan_scope: CONTROL_SCOPE,
    matchers: &[
        Matcher::Structural("button[data-easy-apply-next-button]"),
        Matcher::Text("next"),
        Matcher::AriaLabel("continue to next step"),
        Matcher::DataMarker("data-live-test-easy-apply-next-button"),
    ],
};

pub static REVIEW_RULE: LocatorRule = LocatorRule {
    name: "review",
    scan_scope: CONTROL_SCOPE,
    matchers: &[
        Matcher::Structural("button[data-easy-apply-review-button]"),
        Matcher::Text("review"),
        Matcher::AriaLabel("review your application"),
        Matcher::DataMarker("data-live-test-easy-apply-review-button"),
    ],
};

pub static SUBMIT_RULE: LocatorRule = LocatorRule {
    name: "submit",
    scan_scope: CONTROL_SCOPE,
    matchers: &[
        Matcher::Text("submit application"),
        Matcher::AriaLabel("submit application"),
    ],
};

/// Success marker shown once an application went through
pub static CONFIRMATION_RULE: LocatorRule = LocatorRule {
    name: "confirmation",
    scan_scope: "h2, h3, p",
    matchers: &[
        Matcher::Structural("[data-test-modal-id=\"post-apply-modal\"]"),
        Matcher::Text("application was sent"),
        Matcher::Text("application submitted"),
    ],
};

pub static JOB_TITLE_RULE: LocatorRule = LocatorRule {
    name: "job-title",
    scan_scope: "h1",
    matchers: &[
        Matcher::Structural(".job-details-jobs-unified-top-card__job-title"),
        Matcher::Structural(".jobs-unified-top-card__job-title"),
        Matcher::Structural("h1"),
    ],
};

pub static COMPANY_RULE: LocatorRule = LocatorRule {
    name: "company",
    scan_scope: "a, div",
    matchers: &[
        Matcher::Structural(".job-details-jobs-unified-top-card__company-name"),
        Matcher::Structural(".jobs-unified-top-card__company-name"),
        Matcher::DataMarker("data-job-company-name"),
    ],
};

/// Rule for one control kind
pub fn control_rule(kind: ControlKind) -> &'static LocatorRule {
    match kind {
        ControlKind::EasyApply => &EASY_APPLY_RULE,
        ControlKind::Next => &NEXT_RULE,
        ControlKind::Review => &REVIEW_RULE,
        ControlKind::Submit => &SUBMIT_RULE,
    }
}
