//! Nexus client entry point.

use anyhow::Result;
use clap::Parser;
use nexus_app::config::CONFIG_ENV;
use tracing::info;

/// Inventory and market dashboard sync client
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via NEXUS_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Page to mount, e.g. /dashboard or /market
    #[arg(short, long)]
    page: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    nexus_telemetry::init_logging()?;

    info!("Starting Nexus v{}", env!("CARGO_PKG_VERSION"));

    // CLI arg > NEXUS_CONFIG env var > default path (defaults when absent)
    let mut config = match args.config.or_else(|| std::env::var(CONFIG_ENV).ok()) {
        Some(path) => {
            info!(config_path = %path, "Loading configuration");
            nexus_app::AppConfig::from_file(&path)?
        }
        None => nexus_app::AppConfig::load()?,
    };

    if let Some(page) = args.page {
        config.page.path = page;
    }
    info!(base_url = %config.api.base_url, page = %config.page.path, "Configuration loaded");

    let mut app = nexus_app::Application::new(config)?;
    app.run().await?;

    Ok(())
}
