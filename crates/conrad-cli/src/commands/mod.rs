//! CLI command implementations.

pub mod check;
pub mod record;

use anyhow::{Context, Result};
use clap::Args;
use conrad_core::{ComponentConfig, RecorderConfig};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Recorder configuration flags shared by all commands.
#[derive(Args, Debug, Clone, Default)]
pub struct RecorderArgs {
    /// Recorder configuration file (.yaml, .yml, .toml or .json).
    #[arg(long, short, env = "CONRAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Append a processor by registry name (repeatable).
    #[arg(long = "processor", short = 'p')]
    pub processors: Vec<String>,

    /// Formatter registry name, e.g. "json" or "pretty_json".
    #[arg(long)]
    pub formatter: Option<String>,

    /// Emitter registry name, e.g. "stdout" or "discard".
    #[arg(long, conflicts_with = "output")]
    pub emitter: Option<String>,

    /// Append events to this file instead of using the configured emitter.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl RecorderArgs {
    /// Load the configuration file (if any) and apply command-line overrides.
    pub fn resolve(&self) -> Result<RecorderConfig> {
        let mut config = match &self.config {
            Some(path) => RecorderConfig::load(path).with_context(|| {
                format!("Failed to load configuration from {}", path.display())
            })?,
            None => RecorderConfig::default(),
        };

        config
            .processors
            .extend(self.processors.iter().map(|name| ComponentConfig::named(name.as_str())));

        if let Some(formatter) = &self.formatter {
            config.formatter = ComponentConfig::named(formatter.as_str());
        }

        if let Some(emitter) = &self.emitter {
            config.emitter = ComponentConfig::named(emitter.as_str());
        }

        if let Some(output) = &self.output {
            let mut options = Map::new();
            options.insert(
                "path".to_string(),
                Value::String(output.to_string_lossy().into_owned()),
            );
            config.emitter = ComponentConfig::with_options("file", options);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_flags() {
        let config = RecorderArgs::default().resolve().unwrap();
        assert_eq!(config, RecorderConfig::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conrad.yaml");
        fs::write(&path, "processors: [add_uuid]\nformatter: pretty_json\n").unwrap();

        let args = RecorderArgs {
            config: Some(path),
            processors: vec!["add_timestamp".to_string()],
            formatter: Some("json".to_string()),
            output: Some(dir.path().join("audit.log")),
            ..Default::default()
        };
        let config = args.resolve().unwrap();

        let names: Vec<_> = config.processors.iter().filter_map(|p| p.name()).collect();
        assert_eq!(names, vec!["add_uuid", "add_timestamp"]);
        assert_eq!(config.formatter.name(), Some("json"));
        assert_eq!(config.emitter.name(), Some("file"));
        assert!(config.emitter.options().contains_key("path"));
    }

    #[test]
    fn test_missing_config_file() {
        let args = RecorderArgs {
            config: Some(PathBuf::from("/nonexistent/conrad.yaml")),
            ..Default::default()
        };
        let err = args.resolve().unwrap_err();
        assert!(err.to_string().contains("Failed to load configuration"));
    }
}
