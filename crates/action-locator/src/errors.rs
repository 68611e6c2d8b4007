//! Error types for the locator registry

use thiserror::Error;

/// Locator error enumeration
///
/// Probe failures never show up here; healing absorbs them.
#[derive(Debug, Error, Clone)]
pub enum LocatorError {
    /// Backing store could not be read or written
    #[error("Registry store error: {0}")]
    Store(String),

    /// Stored registry could not be (de)serialized
    #[error("Registry format error: {0}")]
    Serde(String),
}

impl From<std::io::Error> for LocatorError {
    fn from(err: std::io::Error) -> Self {
        LocatorError::Store(err.to_string())
    }
}

impl From<serde_yaml::Error> for LocatorError {
    fn from(err: serde_yaml::Error) -> Self {
        LocatorError::Serde(err.to_string())
    }
}
