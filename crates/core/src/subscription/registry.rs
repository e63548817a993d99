use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::{get_json, set_json, KeyValueStore, StoreError, SUBSCRIPTIONS_KEY};

use super::SubscriptionError;

/// Default number of keywords a subscriber may hold.
pub const DEFAULT_MAX_KEYWORDS: usize = 10;

/// Trim and lowercase a keyword into its stored form.
pub fn normalize_keyword(keyword: &str) -> Result<String, SubscriptionError> {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return Err(SubscriptionError::EmptyKeyword);
    }
    Ok(keyword)
}

/// Mapping from subscriber id to their keywords, in subscription order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionRegistry {
    subscribers: BTreeMap<String, Vec<String>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry from the store; an absent key is an empty registry.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, StoreError> {
        Ok(get_json(store, SUBSCRIPTIONS_KEY)?.unwrap_or_default())
    }

    /// Rewrite the whole registry.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StoreError> {
        set_json(store, SUBSCRIPTIONS_KEY, self)
    }

    /// Keywords for `subscriber_id`, empty if they have none.
    pub fn keywords(&self, subscriber_id: &str) -> &[String] {
        self.subscribers
            .get(subscriber_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Add a keyword. State is left untouched on error.
    pub fn add_keyword(
        &mut self,
        subscriber_id: &str,
        keyword: &str,
        max_keywords: usize,
    ) -> Result<(), SubscriptionError> {
        let keyword = normalize_keyword(keyword)?;
        let current = self.keywords(subscriber_id);

        if current.iter().any(|k| k.to_lowercase() == keyword) {
            return Err(SubscriptionError::AlreadySubscribed(keyword));
        }
        if current.len() >= max_keywords {
            return Err(SubscriptionError::CapacityExceeded { max: max_keywords });
        }

        self.subscribers
            .entry(subscriber_id.to_string())
            .or_default()
            .push(keyword);
        Ok(())
    }

    /// Remove a keyword, dropping the subscriber once they hold none.
    pub fn remove_keyword(
        &mut self,
        subscriber_id: &str,
        keyword: &str,
    ) -> Result<(), SubscriptionError> {
        let keyword = normalize_keyword(keyword)?;

        let keywords = self
            .subscribers
            .get_mut(subscriber_id)
            .ok_or_else(|| SubscriptionError::NotSubscribed(keyword.clone()))?;

        let position = keywords
            .iter()
            .position(|k| k.to_lowercase() == keyword)
            .ok_or_else(|| SubscriptionError::NotSubscribed(keyword.clone()))?;
        keywords.remove(position);

        if keywords.is_empty() {
            self.subscribers.remove(subscriber_id);
        }
        Ok(())
    }

    /// Iterate subscribers and their keywords, ordered by subscriber id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.subscribers
            .iter()
            .map(|(id, keywords)| (id.as_str(), keywords.as_slice()))
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn contains_subscriber(&self, subscriber_id: &str) -> bool {
        self.subscribers.contains_key(subscriber_id)
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
