#![warn(clippy::all, rust_2018_idioms)]

//! Command-line harness: answers one datasource request.
//!
//! Reads a `DatasourceRequest` JSON document from the file named by the first
//! argument (or stdin when absent or `-`) and writes the `DatasourceResponse`
//! JSON to stdout. Logs go to stderr.

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::prelude::*;

use awslogs_datasource::app::config::DatasourceConfig;
use awslogs_datasource::app::datasource::DatasourceRequest;
use awslogs_datasource::CloudWatchLogsDatasource;

fn init_logging(config: &DatasourceConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::builder().parse(&config.log_filter))
        .unwrap_or_else(|e| {
            eprintln!("Invalid log filter {:?}: {}", config.log_filter, e);
            tracing_subscriber::EnvFilter::new("info")
        });

    // stdout carries the response, so every log line goes to stderr
    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false),
    );

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return;
    }

    // Bridge log crate events (AWS SDK dependencies) to tracing
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize log-to-tracing bridge: {}", e);
    }
}

async fn read_request(source: Option<&str>) -> Result<DatasourceRequest> {
    let content = match source {
        Some(path) if path != "-" => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read request file {}", path))?,
        _ => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read request from stdin")?;
            buffer
        }
    };

    serde_json::from_str(&content).context("Failed to parse datasource request")
}

async fn run() -> Result<()> {
    let config = DatasourceConfig::load().context("Failed to load configuration")?;
    init_logging(&config);
    tracing::debug!("Configuration: {:?}", config);

    let source = std::env::args().nth(1);
    let request = read_request(source.as_deref()).await?;
    tracing::info!(
        "Answering request with {} queries ({}..{})",
        request.queries.len(),
        request.time_range.from_raw,
        request.time_range.to_raw
    );

    let datasource = CloudWatchLogsDatasource::from_config(&config);
    let response = datasource.query(&request).await?;

    let mut output = serde_json::to_vec_pretty(&response)?;
    output.push(b'\n');
    let mut stdout = tokio::io::stdout();
    stdout.write_all(&output).await?;
    stdout.flush().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!("Request failed: {:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
