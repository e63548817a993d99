//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Watcher cycles and detected items
//! - Notification delivery
//! - Feed fetches and ranking queries

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Watcher
// =============================================================================

/// Watcher cycles by result.
pub static CYCLES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("herald_watch_cycles_total", "Total feed check cycles"),
        &["result"], // "completed", "skipped", "feed_error", "store_error"
    )
    .unwrap()
});

/// Duration of completed or failed cycles, including pacing delays.
pub static CYCLE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "herald_watch_cycle_duration_seconds",
            "Duration of feed check cycles",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["result"],
    )
    .unwrap()
});

/// Items detected as new.
pub static NEW_ITEMS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("herald_new_items_total", "Total feed items detected as new").unwrap()
});

// =============================================================================
// Notifications
// =============================================================================

/// Notification attempts by kind and result.
pub static NOTIFICATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("herald_notifications_total", "Total notification attempts"),
        &["kind", "result"], // kind: "broadcast", "direct"; result: "sent", "failed"
    )
    .unwrap()
});

// =============================================================================
// Feed and rankings
// =============================================================================

/// Feed fetches by result.
pub static FEED_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("herald_feed_fetches_total", "Total feed fetches"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Ranking queries by query and result.
pub static RANKING_QUERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("herald_ranking_queries_total", "Total ranking queries"),
        &["query", "result"], // result: "success", "unavailable"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CYCLES_TOTAL.clone()),
        Box::new(CYCLE_DURATION.clone()),
        Box::new(NEW_ITEMS_TOTAL.clone()),
        Box::new(NOTIFICATIONS_TOTAL.clone()),
        Box::new(FEED_FETCHES.clone()),
        Box::new(RANKING_QUERIES.clone()),
    ]
}
