//! Asynchronous key-value store for the current product and the watchlist.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::Result;

/// Key holding the most recently detected product.
pub const CURRENT_PRODUCT_KEY: &str = "currentProduct";

/// Key holding the append-only watchlist.
pub const WATCHLIST_KEY: &str = "watchlist";

/// Get/set store of JSON values.
///
/// `get` returns only the keys that are present. `set` overwrites each key
/// in the mapping and leaves every other key alone.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read several keys at once.
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>>;

    /// Write several keys at once.
    async fn set(&self, values: HashMap<String, Value>) -> Result<()>;
}

/// Read one key and decode it. Missing and `null` values are `None`.
pub async fn get_json<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let mut values = store.get(&[key]).await?;
    match values.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

/// Encode a value and write it under one key.
pub async fn set_json<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let value = serde_json::to_value(value)?;
    store.set(HashMap::from([(key.to_string(), value)])).await
}
