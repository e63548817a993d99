use std::sync::Arc;

use tracing::{debug, info};

use crate::store::{KeyValueStore, StoreError};

use super::{SubscriptionError, SubscriptionRegistry};

/// Subscribe/unsubscribe/list against the persisted registry.
///
/// Each mutation loads the whole registry, applies the change and writes it
/// back. Two concurrent mutations for the same subscriber can lose an update.
pub struct SubscriptionService {
    store: Arc<dyn KeyValueStore>,
    max_keywords: usize,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn KeyValueStore>, max_keywords: usize) -> Self {
        Self {
            store,
            max_keywords,
        }
    }

    pub fn max_keywords(&self) -> usize {
        self.max_keywords
    }

    /// Keywords held by `subscriber_id` (empty if none).
    pub fn list(&self, subscriber_id: &str) -> Result<Vec<String>, SubscriptionError> {
        let registry = SubscriptionRegistry::load(self.store.as_ref())?;
        Ok(registry.keywords(subscriber_id).to_vec())
    }

    /// Add a keyword and return the subscriber's updated list.
    pub fn subscribe(
        &self,
        subscriber_id: &str,
        keyword: &str,
    ) -> Result<Vec<String>, SubscriptionError> {
        let mut registry = SubscriptionRegistry::load(self.store.as_ref())?;
        registry.add_keyword(subscriber_id, keyword, self.max_keywords)?;
        registry.save(self.store.as_ref())?;

        let keywords = registry.keywords(subscriber_id).to_vec();
        info!(
            subscriber = subscriber_id,
            count = keywords.len(),
            "Keyword subscription added"
        );
        Ok(keywords)
    }

    /// Remove a keyword and return the subscriber's remaining list.
    pub fn unsubscribe(
        &self,
        subscriber_id: &str,
        keyword: &str,
    ) -> Result<Vec<String>, SubscriptionError> {
        let mut registry = SubscriptionRegistry::load(self.store.as_ref())?;
        registry.remove_keyword(subscriber_id, keyword)?;
        registry.save(self.store.as_ref())?;

        let keywords = registry.keywords(subscriber_id).to_vec();
        if keywords.is_empty() {
            debug!(subscriber = subscriber_id, "Subscriber has no keywords left");
        }
        info!(subscriber = subscriber_id, "Keyword subscription removed");
        Ok(keywords)
    }

    /// Number of subscribers holding at least one keyword.
    pub fn subscriber_count(&self) -> Result<usize, StoreError> {
        Ok(SubscriptionRegistry::load(self.store.as_ref())?.subscriber_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SqliteKvStore, SUBSCRIPTIONS_KEY};

    fn service(max: usize) -> (SubscriptionService, Arc<SqliteKvStore>) {
        let store = Arc::new(SqliteKvStore::in_memory().unwrap());
        let service =
            SubscriptionService::new(Arc::clone(&store) as Arc<dyn KeyValueStore>, max);
        (service, store)
    }

    #[test]
    fn test_subscribe_persists() {
        let (service, store) = service(10);
        let keywords = service.subscribe("u1", "Anime").unwrap();
        assert_eq!(keywords, vec!["anime"]);

        assert_eq!(
            store.get(SUBSCRIPTIONS_KEY).unwrap().unwrap(),
            r#"{"u1":["anime"]}"#
        );
        assert_eq!(service.list("u1").unwrap(), vec!["anime"]);
    }

    #[test]
    fn test_subscribe_twice_fails() {
        let (service, _store) = service(10);
        service.subscribe("u1", "anime").unwrap();
        let err = service.subscribe("u1", "AnImE").unwrap_err();
        assert!(matches!(err, SubscriptionError::AlreadySubscribed(_)));
        assert_eq!(service.list("u1").unwrap().len(), 1);
    }

    #[test]
    fn test_capacity_enforced() {
        let (service, _store) = service(2);
        service.subscribe("u1", "a").unwrap();
        service.subscribe("u1", "b").unwrap();
        let err = service.subscribe("u1", "c").unwrap_err();
        assert!(matches!(err, SubscriptionError::CapacityExceeded { max: 2 }));
        assert_eq!(service.list("u1").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_unsubscribe_last_keyword_removes_entry() {
        let (service, store) = service(10);
        service.subscribe("u1", "anime").unwrap();
        service.subscribe("u2", "music").unwrap();

        let remaining = service.unsubscribe("u1", "anime").unwrap();
        assert!(remaining.is_empty());
        assert_eq!(service.subscriber_count().unwrap(), 1);
        assert_eq!(
            store.get(SUBSCRIPTIONS_KEY).unwrap().unwrap(),
            r#"{"u2":["music"]}"#
        );
    }

    #[test]
    fn test_unsubscribe_unknown_fails() {
        let (service, _store) = service(10);
        let err = service.unsubscribe("u1", "anime").unwrap_err();
        assert!(matches!(err, SubscriptionError::NotSubscribed(_)));
    }

    #[test]
    fn test_list_unknown_subscriber() {
        let (service, _store) = service(10);
        assert!(service.list("nobody").unwrap().is_empty());
        assert_eq!(service.subscriber_count().unwrap(), 0);
    }
}
