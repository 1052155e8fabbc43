// src/main.rs

use anyhow::{Context, Result};
use campus_assistant::{CampusApp, ConfigManager};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let manager = ConfigManager::new(config_path().as_deref())
        .context("Failed to load configuration")?;
    let config = manager.get();

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting campus assistant v{}", env!("CARGO_PKG_VERSION"));

    let app = CampusApp::new(config)
        .await
        .context("Failed to initialize campus assistant")?;

    app.run().await?;

    info!("Campus assistant shut down successfully");
    Ok(())
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// First CLI argument, else `CAMPUS_CONFIG`.
fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os("CAMPUS_CONFIG"))
        .map(PathBuf::from)
}
