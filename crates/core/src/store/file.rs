//! JSON-document file store.
//!
//! The whole store is one JSON object on disk. It is read once at open and
//! rewritten on every write via a temp file and rename, so a crash mid-write
//! leaves the previous document intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use tokio::sync::RwLock;

use super::{KeyValueStore, StoreError};

/// A [`KeyValueStore`] persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    document: RwLock<Map<String, JsonValue>>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. A file that is not a JSON object is
    /// also treated as empty (with a warning) and is replaced on the next
    /// write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let document = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<JsonValue>(&bytes) {
                Ok(JsonValue::Object(map)) => map,
                Ok(_) => {
                    tracing::warn!(path = %path.display(), "Store file is not a JSON object, starting empty");
                    Map::new()
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Store file is corrupt, starting empty");
                    Map::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "Store file not found, starting empty");
                Map::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            document: RwLock::new(document),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, document: &Map<String, JsonValue>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Apply `change`, persist, and roll the in-memory document back if the
    /// write fails.
    async fn update(
        &self,
        key: &str,
        change: impl FnOnce(&mut Map<String, JsonValue>),
    ) -> Result<(), StoreError> {
        let mut document = self.document.write().await;
        let previous = document.get(key).cloned();

        change(&mut document);

        if let Err(e) = self.persist(&document).await {
            match previous {
                Some(value) => document.insert(key.to_string(), value),
                None => document.remove(key),
            };
            tracing::error!(path = %self.path.display(), key, error = %e, "Failed to persist store");
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<JsonValue> {
        self.document.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: JsonValue) -> Result<(), StoreError> {
        self.update(key, |doc| {
            doc.insert(key.to_string(), value);
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(key, |doc| {
            doc.remove(key);
        })
        .await
    }
}
