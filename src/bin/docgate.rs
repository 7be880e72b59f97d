use anyhow::{Context, Result};
use docgate::cli;
use rustls::crypto::ring;

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))
        .context("TLS crypto provider initialization failed")?;
    let action = cli::start()?;

    let result = action.execute().await;

    // Flush any buffered spans before exit.
    cli::telemetry::shutdown_tracer();

    result
}
