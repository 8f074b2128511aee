//! Product catalog store.
//!
//! Owns the `products` key: an array of [`ProductListing`] with the newest
//! entry first. Ids come from an injected [`IdGenerator`]; the default uses
//! the wall clock, which is enough for listings created by hand one form
//! submission at a time.

use std::sync::atomic::{AtomicI64, Ordering};

use serde_json::Value as JsonValue;
use tokio::sync::Mutex;

use crate::store::{self, KeyValueStore, StoreError, keys};
use crate::types::{ProductDraft, ProductField, ProductId, ProductListing};

/// Error type for catalog mutations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A required field was blank or missing. Nothing was stored.
    #[error("missing required field: {0}")]
    Validation(ProductField),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Source of listing ids.
pub trait IdGenerator: Send + Sync {
    /// Produce the next id. Must be greater than every id produced before.
    fn next_id(&self) -> i64;

    /// Make every later id greater than `id`.
    ///
    /// Called with the newest stored id before each new listing, so ids stay
    /// unique across restarts and clock changes.
    fn advance_past(&self, _id: i64) {}
}

impl<G: IdGenerator + ?Sized> IdGenerator for &G {
    fn next_id(&self) -> i64 {
        (**self).next_id()
    }

    fn advance_past(&self, id: i64) {
        (**self).advance_past(id);
    }
}

/// Ids from the current time in milliseconds.
///
/// Two requests in the same millisecond get consecutive values instead of a
/// duplicate.
#[derive(Debug, Default)]
pub struct TimestampIds {
    last: AtomicI64,
}

impl TimestampIds {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }
}

impl IdGenerator for TimestampIds {
    fn next_id(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let mut previous = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now.max(previous + 1);
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return candidate,
                Err(actual) => previous = actual,
            }
        }
    }

    fn advance_past(&self, id: i64) {
        self.last.fetch_max(id, Ordering::AcqRel);
    }
}

/// Deterministic ids `start, start + 1, ...` for tests and tooling.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicI64,
}

impl SequentialIds {
    #[must_use]
    pub const fn starting_at(start: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::AcqRel)
    }

    fn advance_past(&self, id: i64) {
        self.next.fetch_max(id.saturating_add(1), Ordering::AcqRel);
    }
}

/// The product catalog.
///
/// Mutations read, change and write back the whole `products` array while
/// holding `writes`, so concurrent requests through one catalog never drop
/// each other's changes.
#[derive(Debug)]
pub struct Catalog<S, G = TimestampIds> {
    store: S,
    ids: G,
    writes: Mutex<()>,
}

impl<S: KeyValueStore> Catalog<S> {
    /// Create a catalog over `store` with timestamp ids.
    pub fn with_default_ids(store: S) -> Self {
        Self::new(store, TimestampIds::new())
    }
}

impl<S: KeyValueStore, G: IdGenerator> Catalog<S, G> {
    /// Create a catalog over `store` using `ids` for new listings.
    pub fn new(store: S, ids: G) -> Self {
        Self {
            store,
            ids,
            writes: Mutex::new(()),
        }
    }

    /// All listings, newest first.
    ///
    /// Ties keep their stored order. An empty or unreadable store yields an
    /// empty list; individual malformed entries are skipped.
    pub async fn list_products(&self) -> Vec<ProductListing> {
        let mut products = self.stored_products().await;
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        products
    }

    /// Look up a single listing.
    pub async fn get_product(&self, id: ProductId) -> Option<ProductListing> {
        self.stored_products().await.into_iter().find(|p| p.id == id)
    }

    /// Validate and publish a new listing.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] without touching the store if a
    /// required field is missing, or [`CatalogError::Store`] if the write
    /// fails.
    pub async fn add_product(&self, draft: ProductDraft) -> Result<ProductListing, CatalogError> {
        draft.validate().map_err(CatalogError::Validation)?;

        let _guard = self.writes.lock().await;
        let mut products = self.stored_products().await;

        if let Some(newest) = products.iter().map(|p| p.created_at.max(p.id.as_i64())).max() {
            self.ids.advance_past(newest);
        }
        let created_at = self.ids.next_id();
        let listing = ProductListing {
            id: ProductId::new(created_at),
            name: draft.name.trim().to_string(),
            description: draft.description.trim().to_string(),
            image: draft.image.unwrap_or_default(),
            created_at,
        };

        products.insert(0, listing.clone());
        store::set_json(&self.store, keys::PRODUCTS, &products).await?;

        tracing::info!(product_id = %listing.id, name = %listing.name, "Product added");
        Ok(listing)
    }

    /// Remove the listing with `id`, if present.
    ///
    /// Returns whether a listing was removed. Deleting an unknown id leaves
    /// the collection as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub async fn delete_product(&self, id: ProductId) -> Result<bool, CatalogError> {
        let _guard = self.writes.lock().await;
        let mut products = self.stored_products().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        let removed = products.len() != before;

        store::set_json(&self.store, keys::PRODUCTS, &products).await?;

        if removed {
            tracing::info!(product_id = %id, "Product deleted");
        } else {
            tracing::debug!(product_id = %id, "Delete of unknown product ignored");
        }
        Ok(removed)
    }

    async fn stored_products(&self) -> Vec<ProductListing> {
        let Some(value) = self.store.get(keys::PRODUCTS).await else {
            return Vec::new();
        };

        let JsonValue::Array(entries) = value else {
            tracing::warn!("Stored products are not an array, ignoring");
            return Vec::new();
        };

        entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(listing) => Some(listing),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed product entry");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;
    use crate::store::MemoryStore;

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: "Oro 18k".to_string(),
            image: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
        }
    }

    fn catalog() -> Catalog<MemoryStore, SequentialIds> {
        Catalog::new(MemoryStore::new(), SequentialIds::starting_at(1_000))
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        assert!(catalog().list_products().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_then_delete_scenario() {
        let catalog = catalog();

        let added = catalog.add_product(draft("Anillo")).await.unwrap();
        assert!(added.id.as_i64() > 0);
        assert_eq!(added.created_at, added.id.as_i64());

        let listed = catalog.list_products().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Anillo");
        assert_eq!(listed[0].description, "Oro 18k");

        assert!(catalog.delete_product(added.id).await.unwrap());
        assert!(catalog.list_products().await.is_empty());
    }

    #[tokio::test]
    async fn test_listing_is_newest_first_with_unique_ids() {
        let catalog = catalog();
        for name in ["a", "b", "c", "d"] {
            catalog.add_product(draft(name)).await.unwrap();
        }

        let listed = catalog.list_products().await;
        let names: Vec<_> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["d", "c", "b", "a"]);

        let ids: HashSet<_> = listed.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), listed.len());
    }

    #[tokio::test]
    async fn test_validation_failure_does_not_mutate() {
        let catalog = catalog();
        catalog.add_product(draft("Pulsera")).await.unwrap();

        let err = catalog
            .add_product(ProductDraft {
                description: "   ".to_string(),
                ..draft("Collar")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(ProductField::Description)));
        assert_eq!(catalog.list_products().await.len(), 1);
    }

    #[tokio::test]
    async fn test_fields_are_trimmed() {
        let added = catalog()
            .add_product(ProductDraft {
                name: "  Anillo ".to_string(),
                description: " Oro ".to_string(),
                ..draft("")
            })
            .await
            .unwrap();
        assert_eq!(added.name, "Anillo");
        assert_eq!(added.description, "Oro");
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let catalog = catalog();
        catalog.add_product(draft("Anillo")).await.unwrap();
        let before = catalog.list_products().await;

        assert!(!catalog.delete_product(ProductId::new(42)).await.unwrap());
        assert_eq!(catalog.list_products().await, before);
    }

    #[tokio::test]
    async fn test_sort_ignores_stored_order_and_skips_bad_entries() {
        let store = MemoryStore::with_entries([(
            keys::PRODUCTS,
            json!([
                {"id": 1, "name": "old", "desc": "x", "img": "data:a", "createdAt": 1},
                {"unexpected": true},
                {"id": 3, "name": "new", "description": "y", "image": "data:b", "createdAt": 3},
                {"id": 2, "name": "mid", "description": "z", "image": "data:c", "createdAt": 2}
            ]),
        )]);
        let catalog = Catalog::new(store, SequentialIds::starting_at(10));

        let names: Vec<_> = catalog
            .list_products()
            .await
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_non_array_products_read_as_empty() {
        let store = MemoryStore::with_entries([(keys::PRODUCTS, json!({"oops": 1}))]);
        let catalog = Catalog::new(store, SequentialIds::starting_at(1));
        assert!(catalog.list_products().await.is_empty());

        catalog.add_product(draft("Anillo")).await.unwrap();
        assert_eq!(catalog.list_products().await.len(), 1);
    }

    #[tokio::test]
    async fn test_get_product() {
        let catalog = catalog();
        let added = catalog.add_product(draft("Anillo")).await.unwrap();
        assert_eq!(catalog.get_product(added.id).await, Some(added));
        assert_eq!(catalog.get_product(ProductId::new(7)).await, None);
    }

    #[test]
    fn test_timestamp_ids_strictly_increase() {
        let ids = TimestampIds::new();
        let mut previous = ids.next_id();
        for _ in 0..1_000 {
            let next = ids.next_id();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_timestamp_ids_advance_past_stored_ids() {
        let ids = TimestampIds::new();
        let ahead = chrono::Utc::now().timestamp_millis() + 60_000;
        ids.advance_past(ahead);
        assert!(ids.next_id() > ahead);
    }

    #[tokio::test]
    async fn test_new_ids_follow_newest_stored_listing() {
        let ahead = chrono::Utc::now().timestamp_millis() + 60_000;
        let store = MemoryStore::with_entries([(
            keys::PRODUCTS,
            json!([{"id": ahead, "name": "futuro", "description": "x", "image": "data:a", "createdAt": ahead}]),
        )]);
        let catalog = Catalog::with_default_ids(store);

        let added = catalog.add_product(draft("Anillo")).await.unwrap();
        assert!(added.id.as_i64() > ahead);
        assert_eq!(catalog.list_products().await[0].name, "Anillo");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_are_all_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = crate::store::FileStore::open(dir.path().join("store.json"))
            .await
            .unwrap();
        let catalog = std::sync::Arc::new(Catalog::with_default_ids(store));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let catalog = std::sync::Arc::clone(&catalog);
                tokio::spawn(async move { catalog.add_product(draft(&format!("pieza {i}"))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let listed = catalog.list_products().await;
        assert_eq!(listed.len(), 20);
        let ids: HashSet<_> = listed.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 20);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_deletes_and_adds_do_not_interfere() {
        let catalog = std::sync::Arc::new(catalog());
        let mut existing = Vec::new();
        for i in 0..10 {
            existing.push(catalog.add_product(draft(&format!("vieja {i}"))).await.unwrap().id);
        }

        let mut handles = Vec::new();
        for id in existing {
            let catalog = std::sync::Arc::clone(&catalog);
            handles.push(tokio::spawn(async move {
                catalog.delete_product(id).await.map(|_| ())
            }));
        }
        for i in 0..10 {
            let catalog = std::sync::Arc::clone(&catalog);
            handles.push(tokio::spawn(async move {
                catalog.add_product(draft(&format!("nueva {i}"))).await.map(|_| ())
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let listed = catalog.list_products().await;
        assert_eq!(listed.len(), 10);
        assert!(listed.iter().all(|p| p.name.starts_with("nueva")));
    }
}
