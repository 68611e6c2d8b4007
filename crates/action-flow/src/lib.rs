//! Retrying execution with self-heal
//!
//! Wraps a single logical action in a bounded retry loop. Between attempts it
//! can heal the target's selector through the locator registry, and it reports
//! every attempt to the action recorder.

pub mod errors;
pub mod executor;
pub mod types;

pub use errors::{AttemptFailure, ExecutionFailure};
pub use executor::{ActionExecutor, RetryingExecutor};
pub use types::{DelaySpec, Locate, PerformReport, PerformRequest, RetryConfig, RetryPolicy};
