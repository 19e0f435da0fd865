//! Record parsing: turns one failed simulation log line into a [`ParsedFailure`].
//!
//! Every extraction step degrades to [`UNDEFINED`] on its own when its
//! pattern is absent. Non-numeric timestamps, or a `Request:` marker with no
//! method after it, abort the whole entry.

pub mod extract;
pub mod sanitize;

use chrono::DateTime;

use crate::config::{ParserConfig, RunContext};
use crate::error::{LogError, LogResult};
use crate::types::{ParsedFailure, RawRecord, UNDEFINED, undefined};

/// Extracts structured failure facts from raw records.
#[derive(Debug, Clone)]
pub struct RecordParser {
    config: ParserConfig,
    run: RunContext,
}

impl RecordParser {
    pub fn new(config: ParserConfig, run: RunContext) -> Self {
        Self { config, run }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn run(&self) -> &RunContext {
        &self.run
    }

    /// Parse a failed record. `simulation` is the run's simulation name,
    /// taken from the first line of the log.
    pub fn parse_entry(&self, record: &RawRecord, simulation: &str) -> LogResult<ParsedFailure> {
        if !record.is_failure() {
            return Err(parse_error(record, format!("status is {:?}", record.status)));
        }

        let start = parse_timestamp(record, "request_start", &record.request_start)?;
        let end = parse_timestamp(record, "request_end", &record.request_end)?;
        let response_time_ms = end
            .checked_sub(start)
            .ok_or_else(|| parse_error(record, "response time overflows".into()))?;
        let request_start = format!(
            "{}{}",
            record.request_start,
            "0".repeat(self.config.timestamp_scale_digits as usize)
        );

        let text = record.error.as_str();
        let (request_url, request_params, request_method) = match extract::request_line(text) {
            Some(req) => {
                let method = req
                    .method
                    .ok_or_else(|| parse_error(record, "request has no method".into()))?;
                (
                    sanitize::escape_markup(&req.url),
                    sanitize::redact_session_id(
                        &sanitize::escape_markup(&req.params),
                        &self.config.session_placeholder,
                    ),
                    method,
                )
            }
            None => (undefined(), undefined(), undefined()),
        };

        Ok(ParsedFailure {
            request_name: record.request_name.clone(),
            request_method,
            request_url,
            request_params,
            headers: sanitize::escape_markup(
                &extract::headers(text).unwrap_or_else(undefined),
            ),
            response_body: extract::response_body(text).map(|body| sanitize::escape_markup(&body)),
            response_code: extract::response_code(text).unwrap_or_else(undefined),
            error_code: extract::error_code(text).unwrap_or_else(undefined),
            response_time_ms,
            request_start,
            started_at: DateTime::from_timestamp_millis(start),
            raw_error_text: sanitize::escape_markup(text),
            raw_gatling_error: sanitize::escape_markup(&record.gatling_error),
            simulation: simulation.to_string(),
            environment: self
                .run
                .environment
                .clone()
                .unwrap_or_else(|| UNDEFINED.to_string()),
            test_type: self.run.test_type.clone(),
            user_count: self.run.user_count,
            line_number: record.line_number,
        })
    }
}

fn parse_timestamp(record: &RawRecord, column: &str, value: &str) -> LogResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|e| parse_error(record, format!("{column} {value:?}: {e}")))
}

fn parse_error(record: &RawRecord, message: String) -> LogError {
    LogError::Parse {
        line: record.line_number,
        message,
    }
}
