//! simlog: cluster failed requests from a load-test simulation log.
//!
//! Reads a TOML run configuration, parses the configured simulation log and
//! writes the cluster map as JSON to stdout for reporting collaborators.

use tracing_subscriber::EnvFilter;

use simlog_cli::config::AppConfig;
use simlog_cli::run;
use simlog_parser::FileLogSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "simlog starting");

    // ── Load config ─────────────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/etc/simlog/simlog.toml".to_string());

    let config = AppConfig::from_file(&config_path)?;
    tracing::info!(
        log_path = %config.log_path,
        test_type = %config.run.test_type,
        user_count = config.run.user_count,
        "config loaded"
    );

    // ── Parse + cluster ─────────────────────────────────────────
    let report = run::execute(&config, &FileLogSource).await?;

    if let Some(summary) = report.summary() {
        println!("{summary}");
    }
    println!("{}", run::render(&config, &report)?);

    tracing::info!(clusters = report.clusters.len(), "simlog finished");
    Ok(())
}
