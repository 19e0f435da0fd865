//! One parse pass over a simulation log: records in, cluster map out.

use serde::Serialize;

use crate::aggregator::ErrorAggregator;
use crate::config::{ParserConfig, RunContext};
use crate::error::LogResult;
use crate::parsers::RecordParser;
use crate::source::LogSource;
use crate::types::{ErrorCluster, RawRecord};

/// Outcome of parsing one simulation log.
#[derive(Debug, Clone, Serialize)]
pub struct ParseReport {
    /// `simulation_name` column of the first line.
    pub simulation: Option<String>,
    pub total_lines: usize,
    /// Failed requests parsed and clustered.
    pub failures: usize,
    /// Lines ignored for clustering: too few columns or not a failure.
    pub skipped: usize,
    /// Failed requests that could not be parsed.
    pub unparsed: usize,
    /// Clusters in first-seen order.
    pub clusters: Vec<ErrorCluster>,
}

impl ParseReport {
    /// End-of-run line for the operator, present only when entries were dropped.
    pub fn summary(&self) -> Option<String> {
        (self.unparsed > 0).then(|| format!("Unparsed errors: {}", self.unparsed))
    }

    pub fn cluster(&self, key: &str) -> Option<&ErrorCluster> {
        self.clusters.iter().find(|c| c.key == key)
    }
}

/// Drives [`RecordParser`] and [`ErrorAggregator`] over a whole log.
#[derive(Debug, Clone)]
pub struct SimulationLogParser {
    parser: RecordParser,
}

impl SimulationLogParser {
    pub fn new(config: ParserConfig, run: RunContext) -> Self {
        Self {
            parser: RecordParser::new(config, run),
        }
    }

    pub fn record_parser(&self) -> &RecordParser {
        &self.parser
    }

    /// Read the whole log from `source`, then parse it.
    ///
    /// A source that cannot be read fails the run; nothing is returned.
    pub async fn parse_log(&self, source: &dyn LogSource, path: &str) -> LogResult<ParseReport> {
        tracing::info!(path, "parsing simulation log");
        let lines = source.read_lines(path).await?;
        Ok(self.parse_lines(&lines))
    }

    /// Parse already-read lines in order.
    pub fn parse_lines(&self, lines: &[String]) -> ParseReport {
        let config = self.parser.config();
        let mut aggregator = ErrorAggregator::from_config(config);
        let mut simulation: Option<String> = None;
        let mut failures = 0;
        let mut skipped = 0;
        let mut unparsed = 0;

        for (i, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record = RawRecord::from_line(line, i + 1);
            let sim = simulation.get_or_insert_with(|| record.simulation_name.clone());

            if record.field_count < config.min_fields || !record.is_failure() {
                tracing::trace!(line = record.line_number, "skipping non-failure line");
                skipped += 1;
                continue;
            }

            match self.parser.parse_entry(&record, sim) {
                Ok(failure) => {
                    failures += 1;
                    aggregator.ingest(&failure);
                }
                Err(e) => {
                    tracing::debug!(line = record.line_number, error = %e, "unparsed failure entry");
                    unparsed += 1;
                }
            }
        }

        if unparsed > 0 {
            tracing::warn!(unparsed, "some failure entries could not be parsed");
        }
        tracing::info!(
            total_lines = lines.len(),
            failures,
            clusters = aggregator.len(),
            "simulation log parsed"
        );

        ParseReport {
            simulation,
            total_lines: lines.len(),
            failures,
            skipped,
            unparsed,
            clusters: aggregator.into_clusters(),
        }
    }
}
