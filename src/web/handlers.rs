//! Request handlers for all API endpoints

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::{info, warn};

use super::models::*;
use super::AppState;
use crate::aggregator::ViewModel;
use crate::error::ScanError;

type ApiError = (StatusCode, Json<ErrorResponse>);

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

fn scan_error(err: ScanError) -> ApiError {
    let status = match &err {
        ScanError::EmptyInput => StatusCode::BAD_REQUEST,
        ScanError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            details: Some(err.to_string()),
        }),
    )
}

/// Runs a top-level query and returns the view once the report is in.
pub async fn scan_token(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ViewModel>, ApiError> {
    info!("Scan requested for {}", request.mint.trim());
    state.controller.query(&request.mint).await.map_err(|e| {
        warn!("Scan of {} failed: {}", request.mint.trim(), e);
        scan_error(e)
    })?;
    Ok(Json(state.controller.view().await))
}

/// Follows a token from the current view (e.g. one of the creator's tokens).
pub async fn navigate_token(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ViewModel>, ApiError> {
    state
        .controller
        .navigate(&request.mint)
        .await
        .map_err(scan_error)?;
    Ok(Json(state.controller.view().await))
}

pub async fn get_view(State(state): State<AppState>) -> Json<ViewModel> {
    Json(state.controller.view().await)
}
