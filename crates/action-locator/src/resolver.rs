//! Generic rule resolution

use action_primitives::{ElementHandle, PagePort};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::{errors::LocatorError, rules::control_rule, types::*};

/// Element locator trait
#[async_trait]
pub trait ElementLocator: Send + Sync {
    /// Resolve one of the flow controls
    async fn locate(
        &self,
        page: &dyn PagePort,
        kind: ControlKind,
    ) -> Result<Option<LocatedElement>, LocatorError> {
        self.locate_rule(page, control_rule(kind)).await
    }

    /// Resolve an arbitrary rule
    async fn locate_rule(
        &self,
        page: &dyn PagePort,
        rule: &'static LocatorRule,
    ) -> Result<Option<LocatedElement>, LocatorError>;
}

/// Default locator walking the static rule table
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleTableLocator;

#[async_trait]
impl ElementLocator for RuleTableLocator {
    async fn locate_rule(
        &self,
        page: &dyn PagePort,
        rule: &'static LocatorRule,
    ) -> Result<Option<LocatedElement>, LocatorError> {
        resolve_rule(page, rule).await
    }
}

/// Resolve `kind` with the default rule table
pub async fn locate(
    page: &dyn PagePort,
    kind: ControlKind,
) -> Result<Option<LocatedElement>, LocatorError> {
    resolve_rule(page, control_rule(kind)).await
}

/// Walk `rule.matchers` in order and return the first hit.
///
/// The scan scope is queried at most once, and only if a non-structural
/// matcher is reached.
pub async fn resolve_rule(
    page: &dyn PagePort,
    rule: &'static LocatorRule,
) -> Result<Option<LocatedElement>, LocatorError> {
    if rule.matchers.is_empty() {
        return Err(LocatorError::EmptyRule(rule.name));
    }

    let mut scanned: Option<Vec<ElementHandle>> = None;

    for matcher in rule.matchers {
        let hit = match matcher {
            Matcher::Structural(selector) => page.query_selector(selector).await?,
            _ => {
                if scanned.is_none() {
                    scanned = Some(page.query_selector_all(rule.scan_scope).await?);
                }
                scanned
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .find(|el| matcher.matches_element(el))
                    .cloned()
            }
        };

        if let Some(element) = hit {
            let strategy = matcher.strategy();
            info!(
                rule = rule.name,
                strategy = strategy.name(),
                node = %element.node_id,
                "Located element"
            );
            return Ok(Some(LocatedElement {
                element,
                strategy,
                rule: rule.name,
            }));
        }

        debug!(
            rule = rule.name,
            strategy = matcher.strategy().name(),
            "Matcher found nothing"
        );
    }

    debug!(rule = rule.name, "No element matched any strategy");
    Ok(None)
}
