//! Action verbs and the verb lookup table

use serde::{Deserialize, Serialize};
use std::fmt;
use webheal_core_types::MisuseError;

/// A single logical interaction against an element
///
/// New verbs are new variants plus a row in [`VERB_TABLE`]; there is no
/// per-verb type hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionVerb {
    /// Click the element
    Click,

    /// Replace the element's value with `text`
    Type { text: String },

    /// Choose an option by value
    Select { value: String },

    /// Move the pointer over the element
    Hover,

    /// Any verb the page understands through its generic `execute`
    Custom {
        name: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

type VerbCtor = fn(Option<String>) -> Result<ActionVerb, MisuseError>;

/// Lookup table from verb name to constructor
pub const VERB_TABLE: &[(&str, VerbCtor)] = &[
    ("click", click),
    ("type", type_text),
    ("fill", type_text),
    ("select", select),
    ("hover", hover),
];

fn click(_: Option<String>) -> Result<ActionVerb, MisuseError> {
    Ok(ActionVerb::Click)
}

fn hover(_: Option<String>) -> Result<ActionVerb, MisuseError> {
    Ok(ActionVerb::Hover)
}

fn type_text(value: Option<String>) -> Result<ActionVerb, MisuseError> {
    value
        .map(|text| ActionVerb::Type { text })
        .ok_or_else(|| MisuseError::InvalidVerb("'type' requires a value".to_string()))
}

fn select(value: Option<String>) -> Result<ActionVerb, MisuseError> {
    value
        .map(|value| ActionVerb::Select { value })
        .ok_or_else(|| MisuseError::InvalidVerb("'select' requires a value".to_string()))
}

impl ActionVerb {
    /// Build a verb from its name and optional value via [`VERB_TABLE`]
    ///
    /// Unknown names become [`ActionVerb::Custom`] carrying the value as
    /// its single argument.
    pub fn from_parts(name: &str, value: Option<String>) -> Result<Self, MisuseError> {
        let key = name.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(MisuseError::InvalidVerb("empty verb name".to_string()));
        }

        match VERB_TABLE.iter().find(|(verb, _)| *verb == key) {
            Some((_, ctor)) => ctor(value),
            None => Ok(ActionVerb::Custom {
                name: key,
                args: value.into_iter().collect(),
            }),
        }
    }

    /// Verb name as recorded and logged
    pub fn name(&self) -> &str {
        match self {
            ActionVerb::Click => "click",
            ActionVerb::Type { .. } => "type",
            ActionVerb::Select { .. } => "select",
            ActionVerb::Hover => "hover",
            ActionVerb::Custom { name, .. } => name,
        }
    }

    /// Value carried by the verb, if any
    pub fn value(&self) -> Option<String> {
        match self {
            ActionVerb::Type { text } => Some(text.clone()),
            ActionVerb::Select { value } => Some(value.clone()),
            ActionVerb::Custom { args, .. } if !args.is_empty() => Some(args.join(",")),
            _ => None,
        }
    }
}

impl fmt::Display for ActionVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(value) => write!(f, "{}({})", self.name(), value),
            None => f.write_str(self.name()),
        }
    }
}
