//! cluster_errors: parse a simulation log and group failures into clusters.

use async_trait::async_trait;
use serde_json::json;

use crate::config::{ParserConfig, RunContext};
use crate::error::{LogError, LogResult};
use crate::report;
use crate::simulation::SimulationLogParser;
use crate::source::LogSource;
use crate::types::{LogTool, ToolResult};

pub struct ClusterErrors;

fn optional_string(args: &serde_json::Value, key: &str) -> Option<String> {
    args[key].as_str().map(String::from)
}

#[async_trait]
impl LogTool for ClusterErrors {
    fn name(&self) -> &str {
        "cluster_errors"
    }

    fn description(&self) -> &str {
        "Parse a load-test simulation log and cluster similar request failures"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to the simulation log"
                },
                "type": {
                    "type": "string",
                    "description": "Test type"
                },
                "count": {
                    "type": "integer",
                    "description": "User count"
                },
                "environment": {
                    "type": "string",
                    "description": "Target environment"
                },
                "simulation": {
                    "type": "string",
                    "description": "Simulation name"
                },
                "url": {
                    "type": "string",
                    "description": "Target environment URL"
                },
                "similarity_threshold": {
                    "type": "number",
                    "description": "Duplicate threshold for the similarity ratio (default: 0.7)",
                    "default": 0.7
                }
            },
            "required": ["path", "type", "count"]
        })
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        source: &dyn LogSource,
    ) -> LogResult<ToolResult> {
        let path = args["path"]
            .as_str()
            .ok_or_else(|| LogError::Other("missing 'path' argument".into()))?;
        let test_type = args["type"]
            .as_str()
            .ok_or_else(|| LogError::Other("missing 'type' argument".into()))?;
        let user_count = args["count"]
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| LogError::Other("missing or invalid 'count' argument".into()))?;

        let mut config = ParserConfig::default();
        if let Some(threshold) = args["similarity_threshold"].as_f64() {
            config.similarity_threshold = threshold;
        }
        config.validate()?;

        let run = RunContext {
            environment: optional_string(&args, "environment"),
            test_type: test_type.to_string(),
            user_count,
            simulation: optional_string(&args, "simulation"),
            url: optional_string(&args, "url"),
            duration: None,
            ramp_up: None,
        };

        let parsed = SimulationLogParser::new(config, run.clone())
            .parse_log(source, path)
            .await?;

        let clusters = parsed
            .clusters
            .iter()
            .map(|c| {
                let mut value =
                    serde_json::to_value(c).map_err(|e| LogError::Other(e.to_string()))?;
                value["item_name"] = json!(report::item_name(c));
                value["unique_error_id"] = json!(report::unique_error_id(c));
                value["issue_hash"] = json!(report::issue_hash(c, &run));
                value["response_log"] = json!(report::numbered_samples(
                    "Response",
                    c.response_bodies.iter().map(Option::as_deref),
                ));
                Ok(value)
            })
            .collect::<LogResult<Vec<_>>>()?;
        let total_errors: u64 = parsed.clusters.iter().map(|c| c.error_count).sum();

        let data = json!({
            "path": path,
            "simulation": parsed.simulation,
            "total_lines": parsed.total_lines,
            "failures": parsed.failures,
            "skipped": parsed.skipped,
            "unparsed": parsed.unparsed,
            "cluster_count": clusters.len(),
            "clusters": clusters,
        });

        let cluster_count = parsed.clusters.len();
        let failures = parsed.failures;
        let unparsed = parsed.unparsed;
        Ok(ToolResult::success(
            "cluster_errors",
            data,
            format!(
                "Grouped {failures} failures into {cluster_count} clusters ({total_errors} occurrences, {unparsed} unparsed) from {path}"
            ),
        ))
    }
}
