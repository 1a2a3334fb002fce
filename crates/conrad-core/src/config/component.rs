//! Untyped component references.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A reference to a processor, formatter or emitter as it appears in a
/// configuration file.
///
/// Accepted shapes:
/// - a bare name: `add_uuid`
/// - a map with a `type` field plus options: `{ type: add_uuid, key: id }`
/// - anything else is kept as a [`ComponentConfig::Literal`] so that the
///   recorder can reject it with a message naming the offending value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentConfig {
    /// A registered component name with no options.
    Name(String),

    /// A registered component name with options.
    Detailed {
        #[serde(rename = "type")]
        kind: String,
        #[serde(flatten)]
        options: Map<String, Value>,
    },

    /// A value that does not reference a component at all.
    Literal(Value),
}

impl ComponentConfig {
    /// Reference a component by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Reference a component by name with options.
    pub fn with_options(name: impl Into<String>, options: Map<String, Value>) -> Self {
        Self::Detailed {
            kind: name.into(),
            options,
        }
    }

    /// The referenced component name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Detailed { kind, .. } => Some(kind),
            Self::Literal(_) => None,
        }
    }

    /// Options passed to the component factory (empty for bare names).
    pub fn options(&self) -> Map<String, Value> {
        match self {
            Self::Detailed { options, .. } => options.clone(),
            _ => Map::new(),
        }
    }
}

impl From<&str> for ComponentConfig {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for ComponentConfig {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Value> for ComponentConfig {
    fn from(value: Value) -> Self {
        match value {
            Value::String(name) => Self::Name(name),
            Value::Object(mut options) => match options.remove("type") {
                Some(Value::String(kind)) => Self::Detailed { kind, options },
                Some(kind) => {
                    options.insert("type".to_string(), kind);
                    Self::Literal(Value::Object(options))
                }
                None => Self::Literal(Value::Object(options)),
            },
            other => Self::Literal(other),
        }
    }
}

impl fmt::Display for ComponentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{}", name),
            Self::Literal(value) => write!(f, "{}", value),
            Self::Detailed { .. } => match serde_json::to_string(self) {
                Ok(json) => write!(f, "{}", json),
                Err(_) => write!(f, "{:?}", self),
            },
        }
    }
}
