use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Key holding the seen-item ledger (JSON array of ids).
pub const SEEN_ITEMS_KEY: &str = "seen_items";

/// Key holding the subscription registry (JSON object subscriber -> keywords).
pub const SUBSCRIPTIONS_KEY: &str = "subscriptions";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Simple get/set storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Read and deserialize a JSON value.
pub fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::Serialization(format!("{}: {}", key, e))),
        None => Ok(None),
    }
}

/// Serialize and store a JSON value.
pub fn set_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)
        .map_err(|e| StoreError::Serialization(format!("{}: {}", key, e)))?;
    store.set(key, &raw)
}
