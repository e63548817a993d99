use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::middleware::metrics_middleware;
use super::{handlers, rankings, subscriptions, watcher};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Watcher
        .route("/status", get(watcher::get_status))
        .route("/check", post(watcher::trigger_check))
        // Subscriptions
        .route(
            "/subscriptions/{subscriber_id}",
            get(subscriptions::list_keywords).post(subscriptions::subscribe),
        )
        .route(
            "/subscriptions/{subscriber_id}/{keyword}",
            delete(subscriptions::unsubscribe),
        )
        // Rankings (fresh feed snapshot per request)
        .route("/rankings/today", get(rankings::top_today))
        .route("/rankings/week", get(rankings::top_week))
        .route("/rankings/most-seeded", get(rankings::most_seeded))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
