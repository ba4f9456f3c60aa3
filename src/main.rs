//! Lizeur - Entry point
//!
//! MCP server that reads PDF files through Mistral OCR.

use lizeur::{run_server_with_config, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout is reserved for the MCP transport
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lizeur=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Lizeur v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    config.ensure_cache_dir()?;
    tracing::info!(cache_path = %config.cache_path.display(), "Configuration loaded");

    run_server_with_config(config).await
}
