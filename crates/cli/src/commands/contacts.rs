//! Contact detail commands.

use vadaf_core::{ContactBook, FileStore};

/// Log the stored contact details as JSON.
///
/// # Errors
///
/// Returns an error if the record cannot be serialized.
pub async fn show(store: &FileStore) -> Result<(), Box<dyn std::error::Error>> {
    let record = ContactBook::new(store).load_contacts().await;
    tracing::info!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

/// Restore the built-in contact details.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub async fn reset(store: &FileStore) -> Result<(), Box<dyn std::error::Error>> {
    ContactBook::new(store).reset_contacts().await?;
    tracing::info!("Valores predeterminados cargados.");
    Ok(())
}
