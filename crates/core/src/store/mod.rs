//! Key-value store adapter.
//!
//! Everything persistent goes through [`KeyValueStore`]: string keys mapped to
//! JSON values. Reads never fail; a value that cannot be decoded is reported
//! as absent so callers fall back to their defaults. Writes are independent
//! and last-writer-wins.

mod memory;

#[cfg(any(test, feature = "file-store"))]
mod file;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value as JsonValue;

#[cfg(any(test, feature = "file-store"))]
pub use file::FileStore;
pub use memory::MemoryStore;

/// Well-known store keys.
pub mod keys {
    /// Ordered array of product listings.
    pub const PRODUCTS: &str = "products";

    /// The contact record object.
    pub const CONTACTS: &str = "contacts";

    /// `"true"` while the visitor is logged in to the admin panel.
    pub const IS_ADMIN: &str = "isAdmin";
}

/// Error type for store writes.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store backend error: {0}")]
    Backend(String),
}

/// A JSON key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent or unreadable.
    async fn get(&self, key: &str) -> Option<JsonValue>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: JsonValue) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> Option<JsonValue> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: JsonValue) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key).await
    }
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    async fn get(&self, key: &str) -> Option<JsonValue> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: JsonValue) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key).await
    }
}

/// Read and decode a typed value.
///
/// Decode failures are logged and reported as `None`.
pub async fn get_json<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let value = store.get(key).await?;
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring undecodable stored value");
            None
        }
    }
}

/// Encode and store a typed value.
///
/// # Errors
///
/// Returns an error if encoding fails or the store rejects the write.
pub async fn set_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + Sync + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let value = serde_json::to_value(value)?;
    store.set(key, value).await
}
