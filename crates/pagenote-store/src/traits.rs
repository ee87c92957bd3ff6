//! KvStore trait: the abstract interface for local persistence.
//!
//! Values are strings; structured values are stored as JSON through
//! [`KvStoreExt`].

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

/// Async key-value persistence.
///
/// `set` replaces any existing value. `remove` on a missing key is not an
/// error; it reports whether something was removed.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Get the value for a key.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Create or replace the value for a key.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Returns `true` if it existed.
    async fn remove(&self, key: &str) -> Result<bool>;

    /// All keys starting with `prefix`, in ascending order.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Extension trait for JSON values.
pub trait KvStoreExt: KvStore {
    /// Get and deserialize a JSON value.
    fn get_json<T>(&self, key: &str) -> impl std::future::Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned + Send;

    /// Serialize and store a JSON value.
    fn set_json<T>(&self, key: &str, value: &T) -> impl std::future::Future<Output = Result<()>> + Send
    where
        T: Serialize + Sync;
}

impl<S: KvStore + ?Sized> KvStoreExt for S {
    async fn get_json<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw).await
    }
}
