//! Admin session flag.
//!
//! A single boolean stored as the string `"true"` under [`keys::IS_ADMIN`].
//! Credentials are one fixed pair checked by literal comparison. This only
//! hides the admin panel from casual visitors; there is nothing server-side
//! worth protecting behind it.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::store::{KeyValueStore, StoreError, keys};

/// The admin username.
pub const ADMIN_USERNAME: &str = "VadafJoyeria";

const ADMIN_PASSWORD: &str = "DaniVadafj";

const FLAG_VALUE: &str = "true";

/// Whether the current visitor sees the admin panel or the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdminState {
    #[default]
    LoggedOut,
    LoggedIn,
}

impl AdminState {
    /// State after a successful login.
    #[must_use]
    pub const fn login(self) -> Self {
        Self::LoggedIn
    }

    /// State after logout.
    #[must_use]
    pub const fn logout(self) -> Self {
        Self::LoggedOut
    }

    #[must_use]
    pub const fn is_logged_in(self) -> bool {
        matches!(self, Self::LoggedIn)
    }
}

/// Check a username/password pair against the fixed credentials.
///
/// The username is trimmed; the password is compared as typed.
#[must_use]
pub fn credentials_match(username: &str, password: &SecretString) -> bool {
    username.trim() == ADMIN_USERNAME && password.expose_secret() == ADMIN_PASSWORD
}

/// The persisted "is authenticated" flag.
#[derive(Debug, Clone)]
pub struct SessionFlag<S> {
    store: S,
}

impl<S: KeyValueStore> SessionFlag<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Try to log in.
    ///
    /// On a match the flag is set and `true` returned. On a mismatch the flag
    /// is left exactly as it was and `false` returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials match but the flag cannot be stored.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<bool, StoreError> {
        if !credentials_match(username, password) {
            tracing::warn!(username = %username.trim(), "Admin login rejected");
            return Ok(false);
        }

        self.store
            .set(keys::IS_ADMIN, JsonValue::String(FLAG_VALUE.to_string()))
            .await?;
        tracing::info!("Admin logged in");
        Ok(true)
    }

    /// Clear the flag unconditionally.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the removal.
    pub async fn logout(&self) -> Result<(), StoreError> {
        self.store.remove(keys::IS_ADMIN).await?;
        tracing::info!("Admin logged out");
        Ok(())
    }

    /// Whether the flag is currently set.
    pub async fn is_authenticated(&self) -> bool {
        matches!(
            self.store.get(keys::IS_ADMIN).await,
            Some(JsonValue::String(value)) if value == FLAG_VALUE
        )
    }

    /// The admin surface state implied by the stored flag.
    pub async fn state(&self) -> AdminState {
        if self.is_authenticated().await {
            AdminState::LoggedIn
        } else {
            AdminState::LoggedOut
        }
    }
}
