//! Subcommand implementations.
//!
//! Every command works on the same [`FileStore`] the storefront serves from.

use std::path::Path;

use thiserror::Error;
use vadaf_core::{FileStore, ProductId, StoreError};

pub mod contacts;
pub mod products;
pub mod seed;

/// Errors specific to CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No listing with the given id exists.
    #[error("No listing with id {0}")]
    UnknownProduct(ProductId),
}

/// Open the data file, creating an empty store if it does not exist yet.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub async fn open_store(path: &Path) -> Result<FileStore, StoreError> {
    let store = FileStore::open(path).await?;
    tracing::debug!(path = %path.display(), "Opened data file");
    Ok(store)
}
