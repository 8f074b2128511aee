//! Seed a fresh data file.

use vadaf_core::store::{self, keys};
use vadaf_core::{ContactBook, ContactDraft, FileStore};

/// Write the default contact details unless a record is already stored.
///
/// Existing listings and contact details are left alone.
///
/// # Errors
///
/// Returns an error if the defaults cannot be written.
pub async fn defaults(store: &FileStore) -> Result<(), Box<dyn std::error::Error>> {
    if store::get_json::<ContactDraft, _>(store, keys::CONTACTS).await.is_some() {
        tracing::info!(path = %store.path().display(), "Contact details already present");
        return Ok(());
    }

    let record = ContactBook::new(store).reset_contacts().await?;
    tracing::info!(
        path = %store.path().display(),
        email = %record.email,
        "Default contact details written"
    );
    Ok(())
}
