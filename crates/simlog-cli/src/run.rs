//! One end-to-end run: read the configured log, cluster failures, render output.

use serde::Serialize;
use simlog_parser::{ErrorCluster, LogError, LogSource, ParseReport, SimulationLogParser};

use crate::config::AppConfig;

/// JSON document written to stdout for downstream reporters.
#[derive(Debug, Serialize)]
pub struct RunOutput<'a> {
    pub simulation: Option<&'a str>,
    pub environment: Option<&'a str>,
    pub test_type: &'a str,
    pub user_count: u32,
    pub failures: usize,
    pub unparsed: usize,
    pub clusters: &'a [ErrorCluster],
}

/// Parse the configured log from `source`.
///
/// Fails with [`LogError::NotFound`] before any parsing when the log is absent.
pub async fn execute(config: &AppConfig, source: &dyn LogSource) -> anyhow::Result<ParseReport> {
    if !source.exists(&config.log_path).await {
        tracing::error!(path = %config.log_path, "simulation log not found");
        return Err(LogError::NotFound(config.log_path.clone()).into());
    }
    let parser = SimulationLogParser::new(config.parser.clone(), config.run.clone());
    let report = parser.parse_log(source, &config.log_path).await?;
    Ok(report)
}

/// Render the cluster map as pretty-printed JSON.
pub fn render(config: &AppConfig, report: &ParseReport) -> anyhow::Result<String> {
    let output = RunOutput {
        simulation: config
            .run
            .simulation
            .as_deref()
            .or(report.simulation.as_deref()),
        environment: config.run.environment.as_deref(),
        test_type: &config.run.test_type,
        user_count: config.run.user_count,
        failures: report.failures,
        unparsed: report.unparsed,
        clusters: &report.clusters,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}
