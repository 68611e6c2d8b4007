//! Locator Registry & Self-heal
//!
//! This crate owns the mapping from logical targets to the selector that
//! currently represents them:
//! - `LocatorRegistry`: explicitly constructed, shareable name -> selector map
//! - `HealingStrategy`: ordered probing of alternative selectors
//! - `RegistryStore`: optional durable backing (memory or YAML file)

pub mod errors;
pub mod healer;
pub mod registry;
pub mod store;
pub mod types;

pub use errors::*;
pub use healer::*;
pub use registry::*;
pub use store::*;
pub use types::*;
