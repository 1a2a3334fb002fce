//! Configuration types for Conrad recorders.
//!
//! Configuration can be loaded from YAML, TOML or JSON files; the format is
//! picked from the file extension.
//!
//! ```yaml
//! processors:
//!   - add_uuid
//!   - type: add_timestamp
//!     unit: seconds
//! formatter: json
//! emitter:
//!   type: file
//!   path: /var/log/audit.log
//! ```

pub mod component;
pub mod recorder;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use component::ComponentConfig;
pub use recorder::RecorderConfig;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Resolution of timestamps added to events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampUnit {
    /// Whole seconds since the Unix epoch.
    Seconds,
    /// Milliseconds since the Unix epoch.
    #[default]
    Milliseconds,
}

impl fmt::Display for TimestampUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds => write!(f, "seconds"),
            Self::Milliseconds => write!(f, "milliseconds"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_unit_default() {
        assert_eq!(TimestampUnit::default(), TimestampUnit::Milliseconds);
    }

    #[test]
    fn test_timestamp_unit_serde() {
        let unit: TimestampUnit = serde_json::from_str("\"seconds\"").unwrap();
        assert_eq!(unit, TimestampUnit::Seconds);
        assert_eq!(unit.to_string(), "seconds");

        assert!(serde_json::from_str::<TimestampUnit>("\"minutes\"").is_err());
    }
}
