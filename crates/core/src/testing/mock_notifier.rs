//! Mock notifier for testing.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::feed::FeedItem;
use crate::notifier::{DeliveryError, Notifier};

/// A delivered direct message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDirect {
    pub subscriber_id: String,
    pub item_id: String,
    pub keyword: String,
}

/// Mock implementation of the Notifier trait.
///
/// Records successful deliveries in order. Failures can be injected per
/// item (broadcasts) or per subscriber (direct messages); failed attempts
/// are counted but not recorded as delivered.
#[derive(Debug, Default)]
pub struct MockNotifier {
    broadcasts: Arc<RwLock<Vec<String>>>,
    directs: Arc<RwLock<Vec<RecordedDirect>>>,
    failing_items: Arc<RwLock<HashSet<String>>>,
    unreachable: Arc<RwLock<HashSet<String>>>,
    failed_attempts: Arc<RwLock<usize>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcasts for this item id fail.
    pub async fn fail_broadcasts_for(&self, item_id: &str) {
        self.failing_items.write().await.insert(item_id.to_string());
    }

    /// Direct messages to this subscriber fail as unreachable.
    pub async fn fail_directs_to(&self, subscriber_id: &str) {
        self.unreachable
            .write()
            .await
            .insert(subscriber_id.to_string());
    }

    /// Ids of successfully broadcast items, in delivery order.
    pub async fn broadcast_ids(&self) -> Vec<String> {
        self.broadcasts.read().await.clone()
    }

    pub async fn broadcast_count(&self) -> usize {
        self.broadcasts.read().await.len()
    }

    /// Successfully delivered direct messages, in delivery order.
    pub async fn directs(&self) -> Vec<RecordedDirect> {
        self.directs.read().await.clone()
    }

    pub async fn failed_attempts(&self) -> usize {
        *self.failed_attempts.read().await
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send_broadcast(&self, item: &FeedItem) -> Result<(), DeliveryError> {
        if self.failing_items.read().await.contains(&item.id) {
            *self.failed_attempts.write().await += 1;
            return Err(DeliveryError::ApiError {
                status: 500,
                message: "mock broadcast failure".to_string(),
            });
        }

        self.broadcasts.write().await.push(item.id.clone());
        Ok(())
    }

    async fn send_direct(
        &self,
        subscriber_id: &str,
        item: &FeedItem,
        keyword: &str,
    ) -> Result<(), DeliveryError> {
        if self.unreachable.read().await.contains(subscriber_id) {
            *self.failed_attempts.write().await += 1;
            return Err(DeliveryError::RecipientUnreachable(
                subscriber_id.to_string(),
            ));
        }

        self.directs.write().await.push(RecordedDirect {
            subscriber_id: subscriber_id.to_string(),
            item_id: item.id.clone(),
            keyword: keyword.to_string(),
        });
        Ok(())
    }
}
