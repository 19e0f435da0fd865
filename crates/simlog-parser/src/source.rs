//! Log source abstraction: read simulation logs from files, mocks, or other backends.

use async_trait::async_trait;

use crate::error::{LogError, LogResult};

/// Abstraction for reading simulation log data.
///
/// The whole file is read before parsing starts, so a source that cannot be
/// opened fails the run without producing a partial cluster map.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Read all lines from the given path/identifier.
    async fn read_lines(&self, path: &str) -> LogResult<Vec<String>>;

    /// Check if a source path exists and is readable.
    async fn exists(&self, path: &str) -> bool;
}

/// Reads simulation logs from the local filesystem.
pub struct FileLogSource;

#[async_trait]
impl LogSource for FileLogSource {
    async fn read_lines(&self, path: &str) -> LogResult<Vec<String>> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogError::NotFound(path.to_string())
            } else {
                LogError::Io(format!("{path}: {e}"))
            }
        })?;
        Ok(content.lines().map(String::from).collect())
    }

    async fn exists(&self, path: &str) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}
