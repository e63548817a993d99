//! Picks the not-yet-announced items out of a snapshot.

use std::collections::HashSet;

use crate::feed::FeedItem;
use crate::ledger::SeenLedger;

/// Items to announce this cycle, in feed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    pub new_items: Vec<FeedItem>,
}

impl Detection {
    /// Ids to append to the ledger, in the same order.
    pub fn new_ids(&self) -> Vec<String> {
        self.new_items.iter().map(|item| item.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.new_items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.new_items.len()
    }
}

/// Examine at most the first `window` entries of `items` and keep those the
/// ledger does not know. An id repeated within the snapshot is kept once.
///
/// Entries beyond the window are ignored this cycle even if unseen.
pub fn detect_new_items(items: &[FeedItem], ledger: &SeenLedger, window: usize) -> Detection {
    let mut taken = HashSet::new();
    let new_items = items
        .iter()
        .take(window)
        .filter(|item| !ledger.is_known(&item.id))
        .filter(|item| taken.insert(item.id.clone()))
        .cloned()
        .collect();

    Detection { new_items }
}
