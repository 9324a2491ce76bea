use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use market_scan::catalog::{PROBE_TIMEOUT_SECS, PROBE_USER_AGENT};
use market_scan::traits::HttpProber;
use market_scan::{write_reports, Cli, MarketScan};
use play_store_client::PlayStoreClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings();

    let store = PlayStoreClient::new(&settings.lang, &settings.country)
        .context("Failed to build Play Store client")?;
    let prober = HttpProber::new(PROBE_USER_AGENT, Duration::from_secs(PROBE_TIMEOUT_SECS))
        .context("Failed to build reachability prober")?;

    let outcome = MarketScan::new(&store, &prober, settings).run().await;

    let written = write_reports(&cli.out_dir, &outcome.report)?;
    info!(files = written.len(), out_dir = %cli.out_dir.display(), "Reports written");
    for path in &written {
        println!("Wrote: {}", path.display());
    }

    Ok(())
}
