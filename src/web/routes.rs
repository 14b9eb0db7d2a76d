//! API route definitions

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use super::AppState;

/// Create all API routes
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/api/health", get(handlers::health_check))

        // Scanning
        .route("/api/scan", post(handlers::scan_token))
        .route("/api/navigate", post(handlers::navigate_token))
        .route("/api/view", get(handlers::get_view))

        // Add state to all routes
        .with_state(state)
}
