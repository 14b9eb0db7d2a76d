use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rugscan::aggregator::ScanController;
use rugscan::config::Config;
use rugscan::web::{server, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Arc::new(Config::load()?);
    info!(
        "Configuration loaded (reports: {}, metadata: {})",
        config.report_base_url, config.nft_base_url
    );

    let controller = ScanController::new(&config)?;

    // One-shot mode: `rugscan <mint>` prints the settled view and exits.
    if let Some(mint) = std::env::args().nth(1) {
        if let Err(e) = controller.query(&mint).await {
            info!("Scan ended with: {}", e);
        }
        controller.wait_for_enrichment().await;
        let view = controller.view().await;
        let rendered = serde_json::to_string_pretty(&view).context("Failed to render view")?;
        println!("{}", rendered);
        return Ok(());
    }

    let state = AppState::new(controller, config);
    server::start_server(state).await
}
