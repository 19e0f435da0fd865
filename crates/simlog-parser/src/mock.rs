//! Mock log source for testing. Serves pre-loaded simulation logs.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::{LogError, LogResult};
use crate::source::LogSource;

/// Path of the canned log served by [`MockLogSource::with_simulation_sample`].
pub const SAMPLE_PATH: &str = "/var/log/gatling/simulation.log";

/// A mock log source that serves pre-loaded content by path.
pub struct MockLogSource {
    files: HashMap<String, Vec<String>>,
}

impl MockLogSource {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    /// Add a file with the given lines.
    pub fn add_file(&mut self, path: impl Into<String>, lines: Vec<String>) {
        self.files.insert(path.into(), lines);
    }

    /// Create a mock with a sample simulation log.
    ///
    /// Holds a run header, one successful request, two near-identical
    /// checkout timeouts (differing only in session id), a login 401,
    /// a malformed short line and a failure with a broken timestamp.
    pub fn with_simulation_sample() -> Self {
        let mut m = Self::new();
        m.add_file(SAMPLE_PATH, sample_lines());
        m
    }
}

/// Lines of the canned simulation log.
pub fn sample_lines() -> Vec<String> {
    let checkout_error = |session: &str| {
        format!(
            r#"Request: https://shop.test/api/checkout?SessionId={session}&cart=77 POST headers: Content-Type=application/json, HTTP Code: GatewayTimeout(504), Response: {{"error": {{"code": "-32000", "message": "upstream timed out"}}}}"#
        )
    };
    let checkout_check = "status.find.in(200,304), but actually found 504";

    vec![
        row(&["RUN", "checkout", "1", "CheckoutSimulation", " ", "1705312800000", " ", "2.0"]),
        row(&[
            "REQUEST", "checkout", "1-1", "CheckoutSimulation", "browse",
            "1705312800100", "1705312800180", "OK", " ", " ",
        ]),
        row(&[
            "REQUEST", "checkout", "1-2", "CheckoutSimulation", "checkout",
            "1705312801000", "1705312831000", "KO", checkout_check, &checkout_error("a1b2c3"),
        ]),
        row(&[
            "REQUEST", "checkout", "1-3", "CheckoutSimulation", "checkout",
            "1705312802000", "1705312832000", "KO", checkout_check, &checkout_error("z9y8x7"),
        ]),
        row(&[
            "REQUEST", "checkout", "1-4", "CheckoutSimulation", "login",
            "1705312803000", "1705312803040", "KO",
            "status.find.is(200), but actually found 401",
            r#"Request: https://shop.test/api/login POST headers: Accept=*/*, HTTP Code: 401, Response: {"message": "bad credentials"}"#,
        ]),
        row(&["USER", "checkout", "1-5", "START"]),
        row(&[
            "REQUEST", "checkout", "1-6", "CheckoutSimulation", "login",
            "not-a-time", "1705312804040", "KO", "connection refused",
            "j.n.ConnectException: Connection refused",
        ]),
    ]
}

/// Join columns into one tab-delimited log line.
pub fn row(columns: &[&str]) -> String {
    columns.join("\t")
}

impl Default for MockLogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogSource for MockLogSource {
    async fn read_lines(&self, path: &str) -> LogResult<Vec<String>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| LogError::NotFound(path.to_string()))
    }

    async fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}
