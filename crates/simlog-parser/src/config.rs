//! Parser tuning and per-run context, loadable from TOML.

use serde::Deserialize;

use crate::error::{LogError, LogResult};

/// Tuning knobs for record parsing and clustering.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParserConfig {
    /// Two samples are duplicates when their similarity ratio is strictly above this.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Zero digits appended to `request_start` after the response time is computed.
    #[serde(default = "default_timestamp_scale_digits")]
    pub timestamp_scale_digits: u32,
    /// Replacement for redacted session identifier values.
    #[serde(default = "default_session_placeholder")]
    pub session_placeholder: String,
    /// Lines with fewer columns than this are skipped.
    #[serde(default = "default_min_fields")]
    pub min_fields: usize,
}

fn default_similarity_threshold() -> f64 {
    0.7
}

fn default_timestamp_scale_digits() -> u32 {
    6
}

fn default_session_placeholder() -> String {
    "_...".to_string()
}

fn default_min_fields() -> usize {
    8
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            timestamp_scale_digits: default_timestamp_scale_digits(),
            session_placeholder: default_session_placeholder(),
            min_fields: default_min_fields(),
        }
    }
}

impl ParserConfig {
    /// Reject settings that would make clustering meaningless.
    pub fn validate(&self) -> LogResult<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(LogError::Config(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.min_fields == 0 {
            return Err(LogError::Config("min_fields must be at least 1".into()));
        }
        Ok(())
    }
}

/// Run-level arguments supplied once by the orchestrator and attached to
/// every parsed failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RunContext {
    /// Target environment name.
    #[serde(default)]
    pub environment: Option<String>,
    /// Test type (e.g. "load", "stress").
    pub test_type: String,
    /// Concurrent virtual users.
    pub user_count: u32,
    /// Simulation name as shown on dashboards.
    #[serde(default)]
    pub simulation: Option<String>,
    /// Target environment URL.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub ramp_up: Option<String>,
}
