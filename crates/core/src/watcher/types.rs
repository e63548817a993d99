//! Types for the feed watcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feed::FeedError;
use crate::store::StoreError;

use super::dispatcher::DispatchSummary;

/// Errors that abort a cycle.
#[derive(Debug, Error)]
pub enum WatcherError {
    /// The feed could not be fetched or parsed. Nothing was written.
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    /// Ledger or registry storage failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl WatcherError {
    pub fn label(&self) -> &'static str {
        match self {
            WatcherError::Feed(_) => "feed_error",
            WatcherError::Store(_) => "store_error",
        }
    }
}

/// What one completed cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Entries in the fetched snapshot.
    pub fetched: usize,
    /// Entries announced this cycle.
    pub new_items: usize,
    pub broadcasts_sent: usize,
    pub broadcasts_failed: usize,
    pub direct_sent: usize,
    pub direct_failed: usize,
    /// Ledger length after the cycle.
    pub ledger_size: usize,
}

impl CycleReport {
    pub(crate) fn new(
        fetched: usize,
        new_items: usize,
        dispatch: DispatchSummary,
        ledger_size: usize,
    ) -> Self {
        Self {
            fetched,
            new_items,
            broadcasts_sent: dispatch.broadcasts_sent,
            broadcasts_failed: dispatch.broadcasts_failed,
            direct_sent: dispatch.direct_sent,
            direct_failed: dispatch.direct_failed,
            ledger_size,
        }
    }
}

/// Result of asking for a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed(CycleReport),
    /// Another cycle was already in flight; nothing was done.
    Skipped,
}

/// Summary of the most recent finished cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastCycle {
    pub finished_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<CycleReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Current status of the watcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherStatus {
    /// Whether the periodic task is running.
    pub running: bool,
    /// Whether a cycle is executing right now.
    pub cycle_in_progress: bool,
    /// Ids currently held by the ledger.
    pub tracked_items: usize,
    /// Subscribers with at least one keyword.
    pub subscribers: usize,
    pub check_interval_ms: u64,
    pub feed_url: String,
    pub last_cycle: Option<LastCycle>,
}
