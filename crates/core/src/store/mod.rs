//! Durable key-value storage for the watcher state.
//!
//! Two keys are used: the seen-item ledger and the subscription registry.
//! Values are whole JSON documents, read and rewritten in full.

mod sqlite;
mod types;

pub use sqlite::SqliteKvStore;
pub use types::*;
