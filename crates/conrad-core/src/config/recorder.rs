//! Recorder configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::{ComponentConfig, ConfigError};

/// Configuration for a recorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Processors, applied in declaration order.
    #[serde(default)]
    pub processors: Vec<ComponentConfig>,

    /// Formatter turning the processed event into text.
    #[serde(default = "default_formatter")]
    pub formatter: ComponentConfig,

    /// Emitter delivering the formatted text.
    #[serde(default = "default_emitter")]
    pub emitter: ComponentConfig,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            processors: Vec::new(),
            formatter: default_formatter(),
            emitter: default_emitter(),
        }
    }
}

fn default_formatter() -> ComponentConfig {
    ComponentConfig::named("json")
}

fn default_emitter() -> ComponentConfig {
    ComponentConfig::named("stdout")
}

impl RecorderConfig {
    /// Load configuration from a file, choosing the parser by extension
    /// (`.yaml`/`.yml`, `.toml` or `.json`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let content = fs::read_to_string(path)?;
        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(ConfigError::Config(format!(
                "Unsupported configuration file: {} (expected .yaml, .yml, .toml or .json)",
                path.display()
            ))),
        }
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Parse configuration from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    /// Parse configuration from JSON content.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(ConfigError::from)
    }
}
