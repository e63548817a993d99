//! Bounded ledger of already-announced item ids.
//!
//! The ledger is an ordered sequence, oldest first. Appending past the
//! capacity evicts from the front, so the most recent ids always survive.

use std::collections::HashSet;

use crate::store::{get_json, set_json, KeyValueStore, StoreError, SEEN_ITEMS_KEY};

/// Default number of ids retained.
pub const DEFAULT_LEDGER_CAPACITY: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenLedger {
    ids: Vec<String>,
    capacity: usize,
}

impl SeenLedger {
    /// An empty ledger holding at most `capacity` ids.
    pub fn new(capacity: usize) -> Self {
        Self {
            ids: Vec::new(),
            capacity,
        }
    }

    /// Build a ledger from a stored sequence, trimming it to `capacity`.
    pub fn from_ids(ids: Vec<String>, capacity: usize) -> Self {
        Self::new(capacity).record_all(ids)
    }

    /// Load the ledger from the store; an absent key is an empty ledger.
    pub fn load(store: &dyn KeyValueStore, capacity: usize) -> Result<Self, StoreError> {
        let ids: Vec<String> = get_json(store, SEEN_ITEMS_KEY)?.unwrap_or_default();
        Ok(Self::from_ids(ids, capacity))
    }

    /// Rewrite the whole ledger.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StoreError> {
        set_json(store, SEEN_ITEMS_KEY, &self.ids)
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.ids.iter().any(|known| known == id)
    }

    /// Append `ids` in order, then drop the oldest entries beyond capacity.
    ///
    /// Ids already present (or repeated within `ids`) are not appended again.
    pub fn record_all<I>(&self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut seen: HashSet<String> = self.ids.iter().cloned().collect();
        let mut next = self.ids.clone();

        for id in ids {
            let id = id.into();
            if seen.insert(id.clone()) {
                next.push(id);
            }
        }

        if next.len() > self.capacity {
            let overflow = next.len() - self.capacity;
            next.drain(..overflow);
        }

        Self {
            ids: next,
            capacity: self.capacity,
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SeenLedger {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_CAPACITY)
    }
}
