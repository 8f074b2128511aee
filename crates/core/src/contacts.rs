//! Contact record manager.
//!
//! Owns the `contacts` key. The record is seeded with the built-in defaults
//! the first time it is read, and every save replaces it wholesale.
//!
//! Rendering is split into two pure projections: [`ContactDisplay`] for the
//! public contact panel and [`ContactForm`] for the admin edit form.

use serde::Serialize;

use crate::store::{self, KeyValueStore, StoreError, keys};
use crate::types::{ContactDraft, ContactRecord};

/// Domain that marks a messaging handle as an existing deep link.
pub const DEEP_LINK_DOMAIN: &str = "wa.me";

/// Prefix for deep links built from a bare phone number.
pub const DEEP_LINK_PREFIX: &str = "https://wa.me/";

/// Reads and writes the contact record.
#[derive(Debug, Clone)]
pub struct ContactBook<S> {
    store: S,
}

impl<S: KeyValueStore> ContactBook<S> {
    /// Create a contact book over `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the stored record, seeding the built-in defaults if none exists.
    ///
    /// A record with missing or blank fields gets those fields from the
    /// defaults. An unreadable record is replaced by the defaults.
    pub async fn load_contacts(&self) -> ContactRecord {
        if let Some(draft) = store::get_json::<ContactDraft, _>(&self.store, keys::CONTACTS).await {
            return draft.resolve();
        }

        let defaults = ContactRecord::default();
        if let Err(e) = store::set_json(&self.store, keys::CONTACTS, &defaults).await {
            tracing::warn!(error = %e, "Failed to seed default contacts");
        }
        defaults
    }

    /// Save a contact form submission.
    ///
    /// Blank fields fall back to the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub async fn save_contacts(&self, draft: ContactDraft) -> Result<ContactRecord, StoreError> {
        let record = draft.resolve();
        store::set_json(&self.store, keys::CONTACTS, &record).await?;
        tracing::info!("Contacts saved");
        Ok(record)
    }

    /// Overwrite the stored record with the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub async fn reset_contacts(&self) -> Result<ContactRecord, StoreError> {
        let record = ContactRecord::default();
        store::set_json(&self.store, keys::CONTACTS, &record).await?;
        tracing::info!("Contacts reset to defaults");
        Ok(record)
    }
}

/// Turn a messaging handle into a deep link.
///
/// A handle that already mentions [`DEEP_LINK_DOMAIN`] anywhere is returned
/// untouched; otherwise every non-digit is stripped and the result appended
/// to [`DEEP_LINK_PREFIX`].
#[must_use]
pub fn messaging_deep_link(handle: &str) -> String {
    if handle.contains(DEEP_LINK_DOMAIN) {
        return handle.to_string();
    }
    let digits: String = handle.chars().filter(char::is_ascii_digit).collect();
    format!("{DEEP_LINK_PREFIX}{digits}")
}

/// Contact record as shown in the public contact panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactDisplay {
    pub phone: String,
    pub messaging_href: String,
    pub messaging_label: String,
    pub email_href: String,
    pub email_label: String,
    pub social_href: String,
    pub social_label: String,
}

impl From<&ContactRecord> for ContactDisplay {
    fn from(record: &ContactRecord) -> Self {
        let social_label = record
            .social_link
            .strip_prefix("https://")
            .or_else(|| record.social_link.strip_prefix("http://"))
            .unwrap_or(&record.social_link)
            .to_string();

        Self {
            phone: record.phone.clone(),
            messaging_href: messaging_deep_link(&record.messaging_handle),
            messaging_label: record.messaging_handle.clone(),
            email_href: format!("mailto:{}", record.email),
            email_label: record.email.clone(),
            social_href: record.social_link.clone(),
            social_label,
        }
    }
}

/// Contact record as pre-filled into the admin edit form (raw values).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub phone: String,
    pub whatsapp: String,
    pub instagram: String,
    pub email: String,
}

impl From<&ContactRecord> for ContactForm {
    fn from(record: &ContactRecord) -> Self {
        Self {
            phone: record.phone.clone(),
            whatsapp: record.messaging_handle.clone(),
            instagram: record.social_link.clone(),
            email: record.email.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_load_on_empty_store_seeds_defaults() {
        let store = MemoryStore::new();
        let book = ContactBook::new(&store);

        let first = book.load_contacts().await;
        assert_eq!(first, ContactRecord::default());
        assert!(store.get(keys::CONTACTS).await.is_some());

        let second = book.load_contacts().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_load_corrupt_record_falls_back_to_defaults() {
        let store = MemoryStore::with_entries([(keys::CONTACTS, json!("garbage"))]);
        let book = ContactBook::new(&store);

        assert_eq!(book.load_contacts().await, ContactRecord::default());
        assert_eq!(
            store.get(keys::CONTACTS).await,
            Some(serde_json::to_value(ContactRecord::default()).unwrap())
        );
    }

    #[tokio::test]
    async fn test_save_all_blank_equals_defaults() {
        let book = ContactBook::new(MemoryStore::new());
        let draft = ContactDraft {
            phone: Some(" ".to_string()),
            messaging_handle: Some(String::new()),
            social_link: Some("  ".to_string()),
            email: Some(String::new()),
        };

        let saved = book.save_contacts(draft).await.unwrap();
        assert_eq!(saved, ContactRecord::default());
        assert_eq!(book.load_contacts().await, ContactRecord::default());
    }

    #[tokio::test]
    async fn test_save_then_reset() {
        let book = ContactBook::new(MemoryStore::new());
        let draft = ContactDraft {
            email: Some("ventas@vadaf.es".to_string()),
            ..ContactDraft::default()
        };

        let saved = book.save_contacts(draft).await.unwrap();
        assert_eq!(saved.email, "ventas@vadaf.es");
        assert_eq!(book.load_contacts().await.email, "ventas@vadaf.es");

        book.reset_contacts().await.unwrap();
        assert_eq!(book.load_contacts().await, ContactRecord::default());
    }

    #[test]
    fn test_deep_link_from_phone_number() {
        assert_eq!(messaging_deep_link("+34 643 06-40 75"), "https://wa.me/34643064075");
    }

    #[test]
    fn test_existing_deep_link_used_verbatim() {
        assert_eq!(
            messaging_deep_link("https://wa.me/34600111222?text=hola"),
            "https://wa.me/34600111222?text=hola"
        );
        // Substring match anywhere, even in odd positions.
        assert_eq!(messaging_deep_link("call wa.me 1"), "call wa.me 1");
    }

    #[test]
    fn test_display_projection() {
        let display = ContactDisplay::from(&ContactRecord::default());
        assert_eq!(display.messaging_href, "https://wa.me/34643064075");
        assert_eq!(display.messaging_label, "+34 643064075");
        assert_eq!(display.email_href, "mailto:servicioalclientevadaf@gmail.com");
        assert_eq!(
            display.social_label,
            "www.instagram.com/joyeria_vadaf?igsh=ZjN4ZHdqdmFxdjVp"
        );
    }

    #[test]
    fn test_projections_are_idempotent() {
        let record = ContactRecord {
            social_link: "http://example.com/vadaf".to_string(),
            ..ContactRecord::default()
        };
        assert_eq!(ContactDisplay::from(&record), ContactDisplay::from(&record));
        assert_eq!(ContactDisplay::from(&record).social_label, "example.com/vadaf");

        let form = ContactForm::from(&record);
        assert_eq!(form.instagram, "http://example.com/vadaf");
        assert_eq!(form.whatsapp, record.messaging_handle);
    }
}
