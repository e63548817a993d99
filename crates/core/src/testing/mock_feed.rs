//! Mock feed fetcher for testing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::feed::{FeedError, FeedFetcher, FeedItem};

/// Mock implementation of the FeedFetcher trait.
///
/// Returns a configurable snapshot, counts fetches, and can fail once or be
/// slowed down to keep a cycle in flight.
#[derive(Debug)]
pub struct MockFeedFetcher {
    url: String,
    items: Arc<RwLock<Vec<FeedItem>>>,
    next_error: Arc<RwLock<Option<FeedError>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    fetches: Arc<RwLock<usize>>,
}

impl Default for MockFeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFeedFetcher {
    pub fn new() -> Self {
        Self {
            url: "mock://feed".to_string(),
            items: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
            fetches: Arc::new(RwLock::new(0)),
        }
    }

    /// Snapshot returned by every subsequent fetch.
    pub async fn set_items(&self, items: Vec<FeedItem>) {
        *self.items.write().await = items;
    }

    /// Make the next fetch fail with `error`.
    pub async fn set_next_error(&self, error: FeedError) {
        *self.next_error.write().await = Some(error);
    }

    /// Sleep this long inside every fetch.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    pub async fn fetch_count(&self) -> usize {
        *self.fetches.read().await
    }
}

#[async_trait]
impl FeedFetcher for MockFeedFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<FeedItem>, FeedError> {
        *self.fetches.write().await += 1;

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(self.items.read().await.clone())
    }
}
