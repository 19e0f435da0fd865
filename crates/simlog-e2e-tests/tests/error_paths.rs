//! E2E tests for error paths and malformed input across crate boundaries.

mod helpers;

use helpers::{TestHarness, http_error, ko_line};
use simlog_cli::config::AppConfig;
use simlog_cli::run;
use simlog_parser::{FileLogSource, LogError, UNDEFINED};

/// A log path that does not exist fails the whole run.
#[tokio::test]
async fn e2e_missing_log_fails_run() {
    let h = TestHarness::new();
    let missing = h.path("nope.log").to_string_lossy().into_owned();
    let config = AppConfig::from_file(&h.write_config(&missing, None)).unwrap();

    let err = run::execute(&config, &FileLogSource).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LogError>(),
        Some(LogError::NotFound(_))
    ));
}

/// Invalid parser settings are rejected at config load.
#[tokio::test]
async fn e2e_invalid_config_rejected() {
    let h = TestHarness::new();
    let log = h.write_log(&[]);
    let config = h.write_config(&log, Some("similarity_threshold = 7.5\n"));
    assert!(AppConfig::from_file(&config).is_err());
}

/// Short lines are skipped without counting as unparsed.
#[tokio::test]
async fn e2e_malformed_line_skipped_silently() {
    let h = TestHarness::new();
    let lines = vec![["REQUEST", "s", "1", "Sim", "login", "KO"].join("\t")];
    let report = h.run_lines(&lines).await;

    assert_eq!(report.skipped, 1);
    assert_eq!(report.unparsed, 0);
    assert!(report.summary().is_none());
    assert!(report.clusters.is_empty());
}

/// A nine-column failure with broken timestamps is counted exactly once and
/// does not stop later entries from clustering.
#[tokio::test]
async fn e2e_bad_timestamps_counted_once() {
    let h = TestHarness::new();
    let mut broken = ko_line("login", "start", "end", "check failed", "");
    broken.truncate(broken.rfind('\t').unwrap());
    let lines = vec![
        broken,
        ko_line(
            "login",
            "10",
            "20",
            "check failed",
            &http_error("/login", "POST", "401", "denied"),
        ),
    ];
    let report = h.run_lines(&lines).await;

    assert_eq!(report.unparsed, 1);
    assert_eq!(report.failures, 1);
    assert_eq!(report.clusters.len(), 1);
    assert_eq!(report.clusters[0].key, format!("login_{UNDEFINED}_401"));
}

/// A log without failures produces an empty cluster map and no summary.
#[tokio::test]
async fn e2e_no_failures() {
    let h = TestHarness::new();
    let lines = vec![
        ["RUN", "s", "1", "QuietSimulation", " ", "0", " ", "2.0"].join("\t"),
        ["REQUEST", "s", "1-1", "QuietSimulation", "home", "1", "5", "OK", " ", " "].join("\t"),
    ];
    let report = h.run_lines(&lines).await;

    assert_eq!(report.simulation.as_deref(), Some("QuietSimulation"));
    assert!(report.clusters.is_empty());
    assert_eq!(report.failures, 0);
    assert!(report.summary().is_none());
}

/// Free text that does not follow the expected shape degrades to sentinels.
#[tokio::test]
async fn e2e_unstructured_error_text() {
    let h = TestHarness::new();
    let lines = vec![ko_line(
        "ws_connect",
        "100",
        "5100",
        "i.n.c.ConnectTimeoutException",
        "connection timed out: shop.test/10.0.0.1:443",
    )];
    let report = h.run_lines(&lines).await;

    let cluster = &report.clusters[0];
    assert_eq!(cluster.key, "ws_connect_undefined_undefined");
    assert_eq!(cluster.request_method, UNDEFINED);
    assert_eq!(cluster.request_url, UNDEFINED);
    assert_eq!(cluster.headers, UNDEFINED);
    assert_eq!(cluster.response_bodies, vec![None]);
    assert_eq!(cluster.request_params, vec![UNDEFINED]);
}

/// A request line without a method drops the entry as unparsed.
#[tokio::test]
async fn e2e_request_without_method_unparsed() {
    let h = TestHarness::new();
    let lines = vec![
        ko_line("login", "10", "20", "check failed", "Request: /login?user=a then failed"),
        ko_line(
            "login",
            "30",
            "40",
            "check failed",
            &http_error("/login", "POST", "401", "denied"),
        ),
    ];
    let report = h.run_lines(&lines).await;

    assert_eq!(report.unparsed, 1);
    assert_eq!(report.failures, 1);
    assert_eq!(report.summary().as_deref(), Some("Unparsed errors: 1"));
    assert_eq!(report.clusters[0].request_method, "POST");
}
