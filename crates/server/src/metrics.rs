//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the Herald server:
//! - HTTP request metrics (latency, counts)
//! - Watcher state, ledger size and subscriber count (collected dynamically)
//! - Core metrics (cycles, notifications, rankings)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;
use tracing::warn;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "herald_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("herald_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "herald_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Watcher Metrics (collected dynamically)
// =============================================================================

/// Watcher running state (1 = running, 0 = stopped).
pub static WATCHER_RUNNING: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "herald_watcher_running",
        "Whether the periodic feed watcher is running (1) or stopped (0)",
    )
    .unwrap()
});

/// Ids held by the seen-item ledger.
pub static LEDGER_SIZE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("herald_ledger_size", "Number of ids in the seen-item ledger").unwrap()
});

/// Subscribers with at least one keyword.
pub static SUBSCRIBERS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "herald_subscribers",
        "Number of subscribers with at least one keyword",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Watcher
    registry
        .register(Box::new(WATCHER_RUNNING.clone()))
        .unwrap();
    registry.register(Box::new(LEDGER_SIZE.clone())).unwrap();
    registry.register(Box::new(SUBSCRIBERS.clone())).unwrap();

    // Core metrics (cycles, notifications, feed, rankings)
    for metric in herald_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the gauges reflect the stored ledger and
/// registry.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    match state.watcher().status().await {
        Ok(status) => {
            WATCHER_RUNNING.set(if status.running { 1 } else { 0 });
            LEDGER_SIZE.set(status.tracked_items as i64);
            SUBSCRIBERS.set(status.subscribers as i64);
        }
        Err(e) => warn!("Failed to collect watcher metrics: {}", e),
    }
}

static NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());
static SUBSCRIPTION_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(/api/v1/subscriptions)/[^/]+(/[^/]+)?$").unwrap());

/// Normalize a path for metric labels (replace ids and keywords with placeholders).
pub fn normalize_path(path: &str) -> String {
    if let Some(caps) = SUBSCRIPTION_PATH.captures(path) {
        let keyword = if caps.get(2).is_some() { "/{keyword}" } else { "" };
        return format!("{}/{{id}}{}", &caps[1], keyword);
    }

    // Applied twice so adjacent numeric segments are both replaced.
    let result = NUMERIC_SEGMENT.replace_all(path, "/{id}$1");
    let result = NUMERIC_SEGMENT.replace_all(&result, "/{id}$1");
    result.to_string()
}
