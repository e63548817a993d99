//! Periodic feed watcher.
//!
//! Detects items not yet announced, fans them out through the notifier and
//! remembers their ids in the seen-item ledger.

mod config;
mod detector;
mod dispatcher;
mod runner;
mod types;

pub use config::WatcherConfig;
pub use detector::{detect_new_items, Detection};
pub use dispatcher::{dispatch_items, DispatchSummary};
pub use runner::FeedWatcher;
pub use types::{CycleOutcome, CycleReport, LastCycle, WatcherError, WatcherStatus};
