//! Error types for page operations

use thiserror::Error;

/// Errors raised by a page capability while probing or executing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Selector resolved to no live element
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Element exists but cannot take the interaction (obscured, disabled, animating)
    #[error("Element not interactable: {0}")]
    NotInteractable(String),

    /// Driver-side timeout
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Verb has no handler on this page capability
    #[error("Unsupported action '{0}'")]
    Unsupported(String),

    /// Underlying driver or protocol error
    #[error("Driver error: {0}")]
    Driver(String),
}

impl ActionError {
    /// Check if this error is likely transient
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ActionError::NotInteractable(_) | ActionError::Timeout(_) | ActionError::Driver(_)
        )
    }
}
