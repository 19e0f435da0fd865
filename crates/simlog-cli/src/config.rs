//! CLI configuration, loadable from TOML.

use serde::Deserialize;
use simlog_parser::{ParserConfig, RunContext};

/// Top-level configuration for one parse run.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Simulation log to parse.
    pub log_path: String,
    /// Run-level context attached to every failure.
    pub run: RunContext,
    /// Parser tuning. Optional; every field has a default.
    #[serde(default)]
    pub parser: ParserConfig,
}

impl AppConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate config from TOML text.
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.parser.validate()?;
        Ok(config)
    }
}
