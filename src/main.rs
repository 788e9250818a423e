//! Remote Jobs Aggregator: binary entrypoint.
//! Runs the ingestion pipeline once and writes the consolidated job index.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use remote_jobs_aggregator::fetch::HttpFetcher;
use remote_jobs_aggregator::sink::{self, WriteOutcome};
use remote_jobs_aggregator::{ingest, ingest::config};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

async fn run() -> Result<()> {
    let mut sources = config::load_sources_default().context("loading source config")?;
    if sources.is_empty() {
        sources = config::default_sources();
    }
    tracing::info!(sources = sources.len(), "starting pipeline run");

    let fetcher = HttpFetcher::new();
    let index = ingest::run_once(&fetcher, &sources).await;

    let path = sink::output_path();
    match sink::write_index(&path, &index).await? {
        WriteOutcome::Written => tracing::info!(
            path = %path.display(),
            total_jobs = index.total_jobs,
            "wrote job index"
        ),
        WriteOutcome::Unchanged => tracing::info!(
            path = %path.display(),
            total_jobs = index.total_jobs,
            "job index unchanged, write skipped"
        ),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    if let Err(e) = run().await {
        tracing::error!(error = ?e, "pipeline run failed");
        std::process::exit(1);
    }
}
