//! Action Primitives - the page capability boundary
//!
//! This crate defines what the execution engine needs from a browser page:
//! - An existence probe used by healing
//! - One method per verb plus a generic `execute` escape hatch
//! - A tagged `ActionVerb` variant dispatched through a lookup table
//! - An in-process `SimulatedPage` for tests and fixture-driven runs

pub mod errors;
pub mod page;
pub mod simulated;
pub mod types;

pub use errors::*;
pub use page::*;
pub use simulated::*;
pub use types::*;
