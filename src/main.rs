//! Command-line interface for pubsub-publisher
//!
//! See `pubsub-publisher --help` for usage examples.

use anyhow::Context;
use clap::Parser;
use pubsub_producer::{PubSubTransport, Publisher};
use pubsub_publisher::{execute, Cli, Settings};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG overrides the --verbose level
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();

    let settings = Settings::from_cli(&cli)?;

    let transport = PubSubTransport::new(&settings.project_id)
        .await
        .context("Failed to initialize Pub/Sub publisher")?;
    let publisher = Publisher::new(transport);

    execute(&settings, &publisher).await?;
    Ok(())
}
