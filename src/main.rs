use anyhow::{Context, Result};
use bench_matcher::app_log;
use bench_matcher::core::ConfigManager;
use bench_matcher::staff_cli::{handle_staff_command, StaffCli};
use clap::Parser;
use std::fs::OpenOptions;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "/tmp/benchmatch.log";
const DEFAULT_LOG_DIRECTIVE: &str = "benchmatch=info,bench_matcher=info";

#[tokio::main]
async fn main() -> Result<()> {
    let log_path = std::env::var("BENCHMATCH_LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_DIRECTIVE))
        .context("Invalid log filter")?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .init();

    let cli = StaffCli::parse();

    let config = ConfigManager::load()?;
    config.ensure_directories().await?;

    app_log!(
        info,
        "Database: {}, extractor: {} ({})",
        config.environment.database_path.display(),
        config.extractor.provider,
        config.extractor.model_name
    );

    handle_staff_command(cli, config).await
}
