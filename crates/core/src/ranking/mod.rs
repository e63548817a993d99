//! Top-N views over a fresh feed snapshot.
//!
//! Read-only: rankings never touch the ledger or the subscription registry.

mod engine;
mod service;

pub use engine::{
    rank_items, RankBy, RankedItem, RankingQuery, TimeWindow, DEFAULT_RANKING_LIMIT,
};
pub use service::RankingService;
