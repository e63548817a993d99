//! Watcher API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use herald_core::{CycleOutcome, CycleReport, WatcherError, WatcherStatus};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::handlers::ErrorResponse;
use crate::state::AppState;

/// Result of a manual check.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    /// "completed" or "skipped"
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<CycleReport>,
}

/// Get watcher status
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<WatcherStatus>, impl IntoResponse> {
    state.watcher().status().await.map(Json).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
    })
}

/// Run a feed check now
pub async fn trigger_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CheckResponse>, impl IntoResponse> {
    info!("Manual feed check requested");

    match state.watcher().run_cycle().await {
        Ok(CycleOutcome::Completed(report)) => Ok(Json(CheckResponse {
            status: "completed",
            report: Some(report),
        })),
        Ok(CycleOutcome::Skipped) => Ok(Json(CheckResponse {
            status: "skipped",
            report: None,
        })),
        Err(e) => {
            warn!("Manual feed check failed: {}", e);
            let status = match e {
                WatcherError::Feed(_) => StatusCode::BAD_GATEWAY,
                WatcherError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(ErrorResponse::new(e.to_string()))))
        }
    }
}
