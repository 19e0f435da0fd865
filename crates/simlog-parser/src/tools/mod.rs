//! Tools that run the parser behind the [`LogTool`](crate::types::LogTool) trait.

pub mod cluster_errors;

use crate::types::LogTool;

pub use cluster_errors::ClusterErrors;

/// Every tool this crate provides, for registration by an orchestrator.
pub fn all_tools() -> Vec<Box<dyn LogTool>> {
    vec![Box::new(ClusterErrors)]
}
