//! Rede CLI binary.

use anyhow::Result;
use rede::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Runs on tokio's current_thread runtime; every command is sequential I/O.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Override with RUST_LOG, e.g. RUST_LOG=rede=debug,rede_jsonl=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rede=info,rede_jsonl=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting rede CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Rede CLI completed successfully");
    Ok(())
}
