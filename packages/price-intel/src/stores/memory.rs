//! In-memory key-value store for testing and development.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::{PriceIntelError, Result};
use crate::traits::store::KeyValueStore;

/// In-memory JSON key-value store.
///
/// Useful for testing and the CLI. Data is lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A writer panicked mid-update; the map may be half written.
fn poisoned<T>(e: PoisonError<T>) -> PriceIntelError {
    PriceIntelError::Storage(e.to_string().into())
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>> {
        let values = self.values.read().map_err(poisoned)?;
        Ok(keys
            .iter()
            .filter_map(|k| values.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, values: HashMap<String, Value>) -> Result<()> {
        self.values.write().map_err(poisoned)?.extend(values);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::store::{get_json, set_json};
    use serde_json::json;

    #[tokio::test]
    async fn test_get_returns_only_present_keys() {
        let store = MemoryStore::new();
        store
            .set(HashMap::from([("a".to_string(), json!(1))]))
            .await
            .unwrap();

        let values = store.get(&["a", "b"]).await.unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values["a"], json!(1));
    }

    #[tokio::test]
    async fn test_set_leaves_other_keys() {
        let store = MemoryStore::new();
        set_json(&store, "a", &1).await.unwrap();
        set_json(&store, "b", &2).await.unwrap();
        set_json(&store, "a", &3).await.unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(get_json::<u32, _>(&store, "a").await.unwrap(), Some(3));
        assert_eq!(get_json::<u32, _>(&store, "b").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_null_reads_as_missing() {
        let store = MemoryStore::new();
        set_json(&store, "watchlist", &Value::Null).await.unwrap();
        assert_eq!(get_json::<Vec<u32>, _>(&store, "watchlist").await.unwrap(), None);
        assert_eq!(get_json::<u32, _>(&store, "missing").await.unwrap(), None);

        store.clear();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_a_storage_error() {
        let store = MemoryStore::new();
        set_json(&store, "a", &1).await.unwrap();

        std::thread::scope(|scope| {
            let handle = scope.spawn(|| {
                let _guard = store.values.write().unwrap();
                panic!("writer died");
            });
            assert!(handle.join().is_err());
        });

        assert!(matches!(
            store.get(&["a"]).await,
            Err(PriceIntelError::Storage(_))
        ));
        assert!(matches!(
            set_json(&store, "b", &2).await,
            Err(PriceIntelError::Storage(_))
        ));
        assert_eq!(store.len(), 1);
    }
}
