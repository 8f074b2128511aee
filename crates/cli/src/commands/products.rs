//! Catalog listing commands.

use vadaf_core::{Catalog, FileStore, ProductId};

use super::CommandError;

/// Log every listing, newest first.
pub async fn list(store: &FileStore) {
    let products = Catalog::with_default_ids(store).list_products().await;

    if products.is_empty() {
        tracing::info!("No hay publicaciones.");
        return;
    }

    tracing::info!("{} listing(s)", products.len());
    for product in &products {
        tracing::info!(
            id = %product.id,
            created_at = product.created_at,
            "{}: {}",
            product.name,
            product.description
        );
    }
}

/// Remove a listing by id.
///
/// # Errors
///
/// Returns an error if no listing has `id` or the store cannot be written.
pub async fn remove(store: &FileStore, id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let removed = Catalog::with_default_ids(store).delete_product(id).await?;
    if !removed {
        return Err(CommandError::UnknownProduct(id).into());
    }
    tracing::info!(%id, "Listing removed");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vadaf_core::{ProductDraft, SequentialIds};

    use super::*;

    async fn store_with_listing(dir: &tempfile::TempDir) -> (FileStore, ProductId) {
        let store = FileStore::open(dir.path().join("store.json")).await.unwrap();
        let listing = Catalog::new(&store, SequentialIds::starting_at(7))
            .add_product(ProductDraft {
                name: "Anillo".to_string(),
                description: "Oro 18k".to_string(),
                image: Some("data:image/png;base64,AA==".to_string()),
            })
            .await
            .unwrap();
        (store, listing.id)
    }

    #[tokio::test]
    async fn test_remove_existing_listing() {
        let dir = tempfile::tempdir().unwrap();
        let (store, id) = store_with_listing(&dir).await;

        remove(&store, id).await.unwrap();

        let reopened = FileStore::open(store.path()).await.unwrap();
        assert!(Catalog::with_default_ids(&reopened).list_products().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_unknown_listing_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (store, _) = store_with_listing(&dir).await;

        let err = remove(&store, ProductId::new(99)).await.unwrap_err();
        assert_eq!(err.to_string(), "No listing with id 99");
        assert_eq!(Catalog::with_default_ids(&store).list_products().await.len(), 1);
    }
}
