//! wayback-archive entry point.
//!
//! Archives every URL given on the command line through Save Page Now and
//! prints one JSON outcome per line on stdout, in input order.
//! Logging goes to stderr so stdout stays machine-readable.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wayback_client::WaybackArchiver;
use wayback_core::AppConfig;

/// Archive URLs with the Internet Archive's Save Page Now API.
#[derive(Debug, Parser)]
#[command(name = "wayback-archive", version)]
struct Args {
    /// URLs to archive.
    #[arg(required = true)]
    urls: Vec<String>,

    /// Reuse an earlier outcome when the same URL appears more than once.
    #[arg(long)]
    check_cache: bool,

    /// Override the number of status checks per job.
    #[arg(long)]
    attempts: Option<u32>,

    /// Override the delay between status checks, in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load().context("loading configuration")?;
    if let Some(attempts) = args.attempts {
        config.poll_max_attempts = attempts;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.poll_interval_ms = interval_ms;
    }
    config.validate().context("validating configuration")?;

    let archiver = WaybackArchiver::from_app_config(&config).context("creating Save Page Now client")?;

    tracing::info!(urls = args.urls.len(), "archiving");

    let on_signal = archiver.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, abandoning pending jobs");
            on_signal.shutdown();
        }
    });

    let outcomes = archiver.archive_many(args.urls, args.check_cache).await;

    let mut failed = 0usize;
    for (url, outcome) in &outcomes {
        if !outcome.is_success() {
            failed += 1;
        }
        let mut line = serde_json::to_value(outcome.as_ref())?;
        line["url"] = serde_json::Value::String(url.clone());
        println!("{line}");
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} URLs failed to archive", outcomes.len());
    }

    Ok(())
}
