//! Execution error types

use action_primitives::ActionError;
use thiserror::Error;
use webheal_core_types::Target;

/// Terminal failure: the retry budget is exhausted
///
/// This is the only error `perform` returns. It carries the attempt count and
/// nothing about healing; the healing trace goes to the log.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("action failed after {attempts} attempts")]
pub struct ExecutionFailure {
    pub attempts: u32,
}

/// One failed attempt, absorbed by the retry loop
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// Target has no current selector
    #[error("target '{target}' is unresolved")]
    Unresolved { target: Target },

    /// The page rejected the action
    #[error(transparent)]
    Action(#[from] ActionError),
}

impl AttemptFailure {
    /// Whether the page reported a condition that may clear on its own
    ///
    /// An unresolved target or a missing element only recovers through healing.
    pub fn is_transient(&self) -> bool {
        match self {
            AttemptFailure::Unresolved { .. } => false,
            AttemptFailure::Action(err) => err.is_retryable(),
        }
    }
}
