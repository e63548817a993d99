//! Fetch-and-rank entry point.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::clock::Clock;
use crate::feed::{FeedError, FeedFetcher};
use crate::metrics;

use super::engine::{rank_items, RankedItem, RankingQuery};

/// Fetches a fresh snapshot for every query.
pub struct RankingService {
    fetcher: Arc<dyn FeedFetcher>,
    clock: Arc<dyn Clock>,
    limit: usize,
}

impl RankingService {
    pub fn new(fetcher: Arc<dyn FeedFetcher>, clock: Arc<dyn Clock>, limit: usize) -> Self {
        Self {
            fetcher,
            clock,
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Run a ranking query.
    ///
    /// An empty vector means nothing qualified; a fetch failure is returned
    /// as an error so callers can report the feed as unavailable.
    pub async fn rank(&self, query: RankingQuery) -> Result<Vec<RankedItem>, FeedError> {
        let items = match self.fetcher.fetch().await {
            Ok(items) => {
                metrics::FEED_FETCHES.with_label_values(&["success"]).inc();
                items
            }
            Err(e) => {
                warn!(query = query.as_str(), error = %e, "Ranking fetch failed");
                metrics::FEED_FETCHES.with_label_values(&["failed"]).inc();
                metrics::RANKING_QUERIES
                    .with_label_values(&[query.as_str(), "unavailable"])
                    .inc();
                return Err(e);
            }
        };

        let ranked = rank_items(
            &items,
            query.window(),
            query.order(),
            self.clock.as_ref(),
            self.limit,
        );
        debug!(
            query = query.as_str(),
            fetched = items.len(),
            ranked = ranked.len(),
            "Ranking computed"
        );
        metrics::RANKING_QUERIES
            .with_label_values(&[query.as_str(), "success"])
            .inc();

        Ok(ranked)
    }
}
