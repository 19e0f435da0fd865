//! Shared test harness for E2E integration tests.
//!
//! Writes simulation logs and TOML configs into a temp directory and drives
//! them through the same config loader and run driver the binary uses.

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use simlog_cli::config::AppConfig;
use simlog_cli::run;
use simlog_parser::{FileLogSource, ParseReport};

/// Temp-dir backed harness for one test.
pub struct TestHarness {
    pub dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write log lines to `simulation.log` and return its path.
    pub fn write_log(&self, lines: &[String]) -> String {
        let path = self.path("simulation.log");
        std::fs::write(&path, lines.join("\n")).unwrap();
        path.to_string_lossy().into_owned()
    }

    /// Write a config pointing at `log_path`, with an optional `[parser]` body.
    pub fn write_config(&self, log_path: &str, parser: Option<&str>) -> String {
        let mut toml = format!(
            r#"
log_path = "{log_path}"

[run]
environment = "perf"
test_type = "load"
user_count = 200
simulation = "CheckoutSimulation"
url = "https://shop.test"
"#
        );
        if let Some(body) = parser {
            toml.push_str("\n[parser]\n");
            toml.push_str(body);
        }
        let path = self.path("simlog.toml");
        std::fs::write(&path, toml).unwrap();
        path.to_string_lossy().into_owned()
    }

    /// Load the config at `config_path` and run the parser against real files.
    pub async fn run(&self, config_path: &str) -> (AppConfig, ParseReport) {
        let config = AppConfig::from_file(config_path).unwrap();
        let report = run::execute(&config, &FileLogSource).await.unwrap();
        (config, report)
    }

    /// Write `lines`, a default config, and run.
    pub async fn run_lines(&self, lines: &[String]) -> ParseReport {
        let log = self.write_log(lines);
        let config = self.write_config(&log, None);
        self.run(&config).await.1
    }
}

/// Build a failed request line with the given error text.
pub fn ko_line(request: &str, start: &str, end: &str, gatling: &str, error: &str) -> String {
    [
        "REQUEST",
        "checkout",
        "1-1",
        "CheckoutSimulation",
        request,
        start,
        end,
        "KO",
        gatling,
        error,
    ]
    .join("\t")
}

/// Error text in the shape the load-test framework writes for HTTP failures.
pub fn http_error(url: &str, method: &str, code: &str, body: &str) -> String {
    format!("Request: {url} {method} headers: Accept=application/json, HTTP Code: {code}, Response: {body}")
}
