//! webheal library
//!
//! Exposes the CLI building blocks for integration testing

pub mod cli;
pub mod config;
pub mod script;

pub use config::{Config, ConfigError};
pub use script::{execute_steps, Script, ScriptError, Step, StepFailure};
