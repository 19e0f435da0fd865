//! Simulation log parsing and fuzzy error clustering.
//!
//! Reads tab-separated load-test simulation logs, extracts structured facts
//! from failed requests (`parsers`), and groups similar failures into a
//! bounded set of clusters (`aggregator`). `report` renders clusters as text
//! for external issue trackers and dashboards.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod mock;
pub mod parsers;
pub mod report;
pub mod similarity;
pub mod simulation;
pub mod source;
pub mod tools;
pub mod types;

// Re-export key types for convenience
pub use aggregator::{ErrorAggregator, IngestOutcome, TrackedField};
pub use config::{ParserConfig, RunContext};
pub use error::{LogError, LogResult};
pub use mock::MockLogSource;
pub use parsers::RecordParser;
pub use simulation::{ParseReport, SimulationLogParser};
pub use source::{FileLogSource, LogSource};
pub use types::{ErrorCluster, LogTool, ParsedFailure, RawRecord, ToolResult, UNDEFINED};
