//! Application state shared across handlers.

use std::sync::Arc;

use vadaf_core::{Catalog, ContactBook, KeyValueStore, TimestampIds};

use crate::config::StorefrontConfig;

/// Store handle shared by the catalog and the contact book.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the shared catalog/contacts store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog<SharedStore, TimestampIds>,
    contacts: ContactBook<SharedStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `store` - Store holding the `products` and `contacts` keys
    #[must_use]
    pub fn new(config: StorefrontConfig, store: SharedStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Catalog::new(Arc::clone(&store), TimestampIds::new()),
                contacts: ContactBook::new(store),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog<SharedStore, TimestampIds> {
        &self.inner.catalog
    }

    /// Get a reference to the contact record manager.
    #[must_use]
    pub fn contacts(&self) -> &ContactBook<SharedStore> {
        &self.inner.contacts
    }
}
