//! Simulation log parsing error types.

use thiserror::Error;

/// Errors that can occur while reading or parsing a simulation log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("source not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

/// Convenience alias for simulation log results.
pub type LogResult<T> = Result<T, LogError>;
