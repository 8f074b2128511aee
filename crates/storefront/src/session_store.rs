//! Visitor session as a key-value store.
//!
//! The admin flag is per browser, so it lives in the tower-sessions record
//! rather than the shared data file. Wrapping the session in
//! [`KeyValueStore`] lets [`SessionFlag`] run unchanged on top of it.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tower_sessions::Session;

use vadaf_core::{AdminState, KeyValueStore, SessionFlag, StoreError};

/// A [`KeyValueStore`] over one visitor's session.
#[derive(Debug, Clone)]
pub struct SessionStore(Session);

impl SessionStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }
}

#[async_trait]
impl KeyValueStore for SessionStore {
    async fn get(&self, key: &str) -> Option<JsonValue> {
        match self.0.get::<JsonValue>(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read session value");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: JsonValue) -> Result<(), StoreError> {
        self.0
            .insert(key, value)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.0
            .remove_value(key)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

/// The admin flag for the visitor owning `session`.
#[must_use]
pub fn admin_flag(session: &Session) -> SessionFlag<SessionStore> {
    SessionFlag::new(SessionStore::new(session.clone()))
}

/// Current admin state for the visitor owning `session`.
pub async fn admin_state(session: &Session) -> AdminState {
    admin_flag(session).state().await
}
