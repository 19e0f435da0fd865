//! Core simulation log types and the LogTool trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LogResult;

/// Placeholder for a field that exists in the schema but could not be extracted.
pub const UNDEFINED: &str = "undefined";

/// Filler for columns missing from a short line.
pub const NOT_FOUND: &str = "not_found";

/// Status marker the load-test framework writes for a failed request.
pub const FAILURE_STATUS: &str = "KO";

/// Number of named columns in a simulation log line.
pub const COLUMN_COUNT: usize = 10;

pub(crate) fn undefined() -> String {
    UNDEFINED.to_string()
}

// ── Raw Record ────────────────────────────────────────────────

/// One tab-delimited line of the simulation log, split into its named columns.
///
/// Columns missing from a short line hold [`NOT_FOUND`]; columns past the
/// tenth are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub action: String,
    pub simulation: String,
    pub thread: String,
    pub simulation_name: String,
    pub request_name: String,
    pub request_start: String,
    pub request_end: String,
    pub status: String,
    pub gatling_error: String,
    pub error: String,
    /// Number of columns actually present on the line.
    pub field_count: usize,
    /// 1-based line number in the source.
    pub line_number: usize,
}

impl RawRecord {
    /// Split a line on tabs into a record.
    pub fn from_line(line: &str, line_number: usize) -> Self {
        let columns: Vec<&str> = line.split('\t').collect();
        let col = |i: usize| {
            columns
                .get(i)
                .map_or_else(|| NOT_FOUND.to_string(), |s| (*s).to_string())
        };

        Self {
            action: col(0),
            simulation: col(1),
            thread: col(2),
            simulation_name: col(3),
            request_name: col(4),
            request_start: col(5),
            request_end: col(6),
            status: col(7),
            gatling_error: col(8),
            error: col(9),
            field_count: columns.len(),
            line_number,
        }
    }

    /// Whether the record carries the failure status marker.
    pub fn is_failure(&self) -> bool {
        self.status == FAILURE_STATUS
    }
}

// ── Parsed Failure ────────────────────────────────────────────

/// Structured facts extracted from one failed request.
///
/// Every string field holds either a real value or [`UNDEFINED`];
/// only `response_body` may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFailure {
    pub request_name: String,
    pub request_method: String,
    pub request_url: String,
    /// Query string with session identifiers redacted.
    pub request_params: String,
    pub headers: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
    pub response_code: String,
    pub error_code: String,
    pub response_time_ms: i64,
    /// `request_start` with the configured timestamp scale applied.
    pub request_start: String,
    /// Request start as wall-clock time (epoch milliseconds in the log).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    pub raw_error_text: String,
    pub raw_gatling_error: String,
    pub simulation: String,
    pub environment: String,
    pub test_type: String,
    pub user_count: u32,
    pub line_number: usize,
}

impl ParsedFailure {
    /// Coarse grouping key: `{request_name}_{error_code}_{response_code}`.
    pub fn cluster_key(&self) -> String {
        format!(
            "{}_{}_{}",
            self.request_name, self.error_code, self.response_code
        )
    }
}

// ── Error Cluster ─────────────────────────────────────────────

/// A group of failures sharing a cluster key, with one sample per
/// similarity class in each tracked field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorCluster {
    pub key: String,
    pub request_name: String,
    pub request_method: String,
    pub request_url: String,
    pub headers: String,
    pub environment: String,
    pub response_code: String,
    pub error_code: String,
    pub error_count: u64,
    pub response_bodies: Vec<Option<String>>,
    pub request_params: Vec<String>,
    pub gatling_errors: Vec<String>,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
}

// ── Tool Result ───────────────────────────────────────────────

/// Result of executing a log tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool name that produced this result.
    pub tool_name: String,
    /// Whether the tool execution succeeded.
    pub success: bool,
    /// Structured result data (JSON).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Human-readable summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Error message if success is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(
        tool_name: impl Into<String>,
        data: serde_json::Value,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            data: Some(data),
            summary: Some(summary.into()),
            error: None,
        }
    }

    pub fn failure(tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            data: None,
            summary: None,
            error: Some(error.into()),
        }
    }
}

// ── LogTool Trait ─────────────────────────────────────────────

/// Trait for tools that run the parser against a log source.
#[async_trait]
pub trait LogTool: Send + Sync {
    /// Tool name (e.g., "cluster_errors").
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON Schema describing accepted arguments.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with JSON arguments against a log source.
    async fn execute(
        &self,
        args: serde_json::Value,
        source: &dyn crate::source::LogSource,
    ) -> LogResult<ToolResult>;
}
