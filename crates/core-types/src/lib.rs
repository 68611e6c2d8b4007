use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Caller-side precondition violations. These fail fast and are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MisuseError {
    #[error("target name must not be empty")]
    EmptyTarget,
    #[error("retry count must not be negative (got {0})")]
    NegativeRetryCount(i64),
    #[error("retry delay must not be negative (got {0})")]
    NegativeRetryDelay(String),
    #[error("invalid retry delay '{0}'")]
    InvalidRetryDelay(String),
    #[error("invalid action verb: {0}")]
    InvalidVerb(String),
}

/// Logical, human-meaningful name of a UI element (e.g. `submit_button`).
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(try_from = "String", into = "String"))]
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Target(String);

impl Target {
    pub fn new(name: impl Into<String>) -> Result<Self, MisuseError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MisuseError::EmptyTarget);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Target {
    type Error = MisuseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Target::new(value)
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque selector expression, resolvable by a page into zero or one elements.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(transparent))]
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Selector(pub String);

impl Selector {
    pub fn new(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Selector {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Correlates the log lines of a single `perform` call.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_rejects_blank_names() {
        assert_eq!(Target::new(""), Err(MisuseError::EmptyTarget));
        assert_eq!(Target::new("   "), Err(MisuseError::EmptyTarget));
        assert_eq!(Target::new("submit_button").unwrap().as_str(), "submit_button");
    }

    #[test]
    fn selector_accepts_anything() {
        assert_eq!(Selector::from("").as_str(), "");
        assert_eq!(Selector::new("#a").to_string(), "#a");
    }

    #[test]
    fn action_ids_are_unique() {
        assert_ne!(ActionId::new(), ActionId::new());
    }

    #[cfg(feature = "serde-full")]
    #[test]
    fn target_deserialization_validates() {
        let ok: Target = serde_json::from_str("\"login\"").unwrap();
        assert_eq!(ok.as_str(), "login");
        assert!(serde_json::from_str::<Target>("\"\"").is_err());
    }
}
