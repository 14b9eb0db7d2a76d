//! Axum web server setup and configuration

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::routes::create_routes;
use super::AppState;

/// Start the Axum web server
pub async fn start_server(state: AppState) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.api_host, state.config.api_port)
        .parse()
        .context("Invalid RUGSCAN_API_HOST or RUGSCAN_API_PORT")?;

    let app = create_app(state);

    info!("Starting API server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

/// Create the Axum router without starting the server (useful for testing)
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_routes(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
}
