//! Subscription API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use herald_core::SubscriptionError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::handlers::ErrorResponse;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for subscribing to a keyword
#[derive(Debug, Deserialize)]
pub struct SubscribeBody {
    pub keyword: String,
}

/// A subscriber's keyword list
#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub subscriber_id: String,
    pub keywords: Vec<String>,
    pub count: usize,
    pub max: usize,
}

impl KeywordsResponse {
    fn new(state: &AppState, subscriber_id: String, keywords: Vec<String>) -> Self {
        Self {
            subscriber_id,
            count: keywords.len(),
            keywords,
            max: state.subscriptions().max_keywords(),
        }
    }
}

fn error_response(e: SubscriptionError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        SubscriptionError::AlreadySubscribed(_) => StatusCode::CONFLICT,
        SubscriptionError::NotSubscribed(_) => StatusCode::NOT_FOUND,
        SubscriptionError::CapacityExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SubscriptionError::EmptyKeyword => StatusCode::BAD_REQUEST,
        SubscriptionError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::new(e.to_string())))
}

// ============================================================================
// Handlers
// ============================================================================

/// List a subscriber's keywords
pub async fn list_keywords(
    State(state): State<Arc<AppState>>,
    Path(subscriber_id): Path<String>,
) -> Result<Json<KeywordsResponse>, impl IntoResponse> {
    match state.subscriptions().list(&subscriber_id) {
        Ok(keywords) => Ok(Json(KeywordsResponse::new(&state, subscriber_id, keywords))),
        Err(e) => Err(error_response(e)),
    }
}

/// Subscribe to a keyword
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    Path(subscriber_id): Path<String>,
    Json(body): Json<SubscribeBody>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    match state.subscriptions().subscribe(&subscriber_id, &body.keyword) {
        Ok(keywords) => Ok((
            StatusCode::CREATED,
            Json(KeywordsResponse::new(&state, subscriber_id, keywords)),
        )),
        Err(e) => Err(error_response(e)),
    }
}

/// Unsubscribe from a keyword
pub async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    Path((subscriber_id, keyword)): Path<(String, String)>,
) -> Result<Json<KeywordsResponse>, impl IntoResponse> {
    match state.subscriptions().unsubscribe(&subscriber_id, &keyword) {
        Ok(keywords) => Ok(Json(KeywordsResponse::new(&state, subscriber_id, keywords))),
        Err(e) => Err(error_response(e)),
    }
}
