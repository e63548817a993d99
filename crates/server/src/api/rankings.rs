//! Ranking API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use herald_core::{RankedItem, RankingQuery};
use serde::Serialize;
use std::sync::Arc;

use super::handlers::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub query: RankingQuery,
    pub items: Vec<RankedItem>,
    pub count: usize,
}

async fn run(
    state: &AppState,
    query: RankingQuery,
) -> Result<Json<RankingResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.rankings().rank(query).await {
        Ok(items) => Ok(Json(RankingResponse {
            query,
            count: items.len(),
            items,
        })),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new(format!("feed unavailable: {}", e))),
        )),
    }
}

/// Most popular items published today
pub async fn top_today(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    run(&state, RankingQuery::TopToday).await
}

/// Most popular items of the last 7 days
pub async fn top_week(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    run(&state, RankingQuery::TopWeek).await
}

/// Items with the most seeders
pub async fn most_seeded(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    run(&state, RankingQuery::MostSeeded).await
}
