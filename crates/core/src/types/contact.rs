//! Business contact record.

use serde::{Deserialize, Serialize};

/// Built-in phone number.
pub const DEFAULT_PHONE: &str = "+34 643064075";
/// Built-in `WhatsApp` handle.
pub const DEFAULT_MESSAGING_HANDLE: &str = "+34 643064075";
/// Built-in Instagram profile.
pub const DEFAULT_SOCIAL_LINK: &str = "https://www.instagram.com/joyeria_vadaf?igsh=ZjN4ZHdqdmFxdjVp";
/// Built-in customer service address.
pub const DEFAULT_EMAIL: &str = "servicioalclientevadaf@gmail.com";

/// The single set of business contact details shown on every page.
///
/// Stored under the `contacts` key. JSON field names are the ones the
/// public site has always used (`whatsapp`, `instagram`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub phone: String,
    #[serde(rename = "whatsapp")]
    pub messaging_handle: String,
    #[serde(rename = "instagram")]
    pub social_link: String,
    pub email: String,
}

impl Default for ContactRecord {
    fn default() -> Self {
        Self {
            phone: DEFAULT_PHONE.to_string(),
            messaging_handle: DEFAULT_MESSAGING_HANDLE.to_string(),
            social_link: DEFAULT_SOCIAL_LINK.to_string(),
            email: DEFAULT_EMAIL.to_string(),
        }
    }
}

/// A possibly incomplete contact record.
///
/// Used both for admin form submissions and for reading whatever is stored,
/// so a record missing a field still loads. Deserializes from the admin form
/// directly (`phone`, `whatsapp`, `instagram`, `email`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, rename = "whatsapp")]
    pub messaging_handle: Option<String>,
    #[serde(default, rename = "instagram")]
    pub social_link: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ContactDraft {
    /// Fill every blank or missing field with its built-in default.
    ///
    /// Supplied values are trimmed.
    #[must_use]
    pub fn resolve(self) -> ContactRecord {
        ContactRecord {
            phone: or_default(self.phone, DEFAULT_PHONE),
            messaging_handle: or_default(self.messaging_handle, DEFAULT_MESSAGING_HANDLE),
            social_link: or_default(self.social_link, DEFAULT_SOCIAL_LINK),
            email: or_default(self.email, DEFAULT_EMAIL),
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_draft_resolves_to_defaults() {
        let draft = ContactDraft {
            phone: Some("   ".to_string()),
            messaging_handle: Some(String::new()),
            social_link: None,
            email: Some("\t".to_string()),
        };
        assert_eq!(draft.resolve(), ContactRecord::default());
    }

    #[test]
    fn test_supplied_values_are_trimmed() {
        let draft = ContactDraft {
            phone: Some("  +34 600 000 000 ".to_string()),
            ..ContactDraft::default()
        };
        let record = draft.resolve();
        assert_eq!(record.phone, "+34 600 000 000");
        assert_eq!(record.email, DEFAULT_EMAIL);
    }

    #[test]
    fn test_record_uses_legacy_field_names() {
        let json = serde_json::to_value(ContactRecord::default()).unwrap();
        assert_eq!(json["whatsapp"], DEFAULT_MESSAGING_HANDLE);
        assert_eq!(json["instagram"], DEFAULT_SOCIAL_LINK);
    }

    #[test]
    fn test_partial_stored_record_deserializes() {
        let draft: ContactDraft =
            serde_json::from_str(r#"{"phone": "+1 555", "whatsapp": ""}"#).unwrap();
        let record = draft.resolve();
        assert_eq!(record.phone, "+1 555");
        assert_eq!(record.messaging_handle, DEFAULT_MESSAGING_HANDLE);
    }
}
