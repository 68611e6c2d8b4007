//! Page capability consumed by the locator and execution crates

use crate::{errors::ActionError, types::ActionVerb};
use async_trait::async_trait;
use tracing::debug;
use webheal_core_types::Selector;

/// What the engine needs from a live page
///
/// Implementations may be a real browser driver, a mock, or a simulator.
/// `exists` must be free of side effects on page state.
#[async_trait]
pub trait PageCapability: Send + Sync {
    /// Check whether the selector currently resolves to a live element
    async fn exists(&self, selector: &Selector) -> Result<bool, ActionError>;

    async fn click(&self, selector: &Selector) -> Result<(), ActionError>;

    async fn fill(&self, selector: &Selector, text: &str) -> Result<(), ActionError>;

    async fn select_option(&self, selector: &Selector, value: &str) -> Result<(), ActionError> {
        self.execute("select", selector, &[value.to_string()]).await
    }

    async fn hover(&self, selector: &Selector) -> Result<(), ActionError> {
        self.execute("hover", selector, &[]).await
    }

    /// Generic escape hatch for verbs without a dedicated method
    async fn execute(
        &self,
        verb: &str,
        _selector: &Selector,
        _args: &[String],
    ) -> Result<(), ActionError> {
        Err(ActionError::Unsupported(verb.to_string()))
    }
}

/// Run one verb against one selector through the page capability
pub async fn dispatch(
    page: &dyn PageCapability,
    verb: &ActionVerb,
    selector: &Selector,
) -> Result<(), ActionError> {
    debug!(verb = verb.name(), selector = %selector, "dispatching action");
    match verb {
        ActionVerb::Click => page.click(selector).await,
        ActionVerb::Type { text } => page.fill(selector, text).await,
        ActionVerb::Select { value } => page.select_option(selector, value).await,
        ActionVerb::Hover => page.hover(selector).await,
        ActionVerb::Custom { name, args } => page.execute(name, selector, args).await,
    }
}
