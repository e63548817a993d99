//! Watcher configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the periodic feed watcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Run the periodic check. When disabled, cycles only run via the API.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Time between periodic checks (milliseconds).
    #[serde(default = "default_check_interval")]
    pub check_interval_ms: u64,

    /// How many of the newest feed entries are examined per cycle.
    #[serde(default = "default_processing_window")]
    pub processing_window: usize,

    /// Maximum number of ids remembered in the seen-item ledger.
    #[serde(default = "default_ledger_capacity")]
    pub ledger_capacity: usize,

    /// Delay after each announced item (milliseconds).
    #[serde(default = "default_pacing")]
    pub pacing_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_check_interval() -> u64 {
    300_000 // 5 minutes
}

fn default_processing_window() -> usize {
    15
}

fn default_ledger_capacity() -> usize {
    crate::ledger::DEFAULT_LEDGER_CAPACITY
}

fn default_pacing() -> u64 {
    2000
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            check_interval_ms: default_check_interval(),
            processing_window: default_processing_window(),
            ledger_capacity: default_ledger_capacity(),
            pacing_ms: default_pacing(),
        }
    }
}
