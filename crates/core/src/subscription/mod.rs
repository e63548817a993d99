//! Per-subscriber keyword filters.
//!
//! `SubscriptionRegistry` holds the invariants (distinct lowercased keywords,
//! bounded count, no empty entries); `SubscriptionService` runs the
//! read-modify-write cycles against the store.

mod registry;
mod service;

pub use registry::{normalize_keyword, SubscriptionRegistry, DEFAULT_MAX_KEYWORDS};
pub use service::SubscriptionService;

use thiserror::Error;

use crate::store::StoreError;

/// Errors from subscription operations.
///
/// All but `Store` are expected, user-facing outcomes.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("already subscribed to '{0}'")]
    AlreadySubscribed(String),

    #[error("not subscribed to '{0}'")]
    NotSubscribed(String),

    #[error("maximum of {max} keyword subscriptions reached")]
    CapacityExceeded { max: usize },

    #[error("keyword cannot be empty")]
    EmptyKeyword,

    #[error("subscription store error: {0}")]
    Store(#[from] StoreError),
}
