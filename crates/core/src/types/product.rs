//! Product listing types.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::ProductId;

/// A published piece of jewelry.
///
/// Stored as one element of the `products` array. Older entries used the
/// short keys `desc` and `img`; both are still accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    pub id: ProductId,
    pub name: String,
    #[serde(alias = "desc")]
    pub description: String,
    /// Image as a `data:` URL.
    #[serde(alias = "img")]
    pub image: String,
    /// Milliseconds since the epoch. Only used for ordering.
    #[serde(default)]
    pub created_at: i64,
}

/// Input for creating a listing, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
}

/// The required fields of a [`ProductDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Name,
    Description,
    Image,
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Description => write!(f, "description"),
            Self::Image => write!(f, "image"),
        }
    }
}

impl ProductDraft {
    /// Check the required fields in form order.
    ///
    /// # Errors
    ///
    /// Returns the first field that is blank after trimming, or
    /// [`ProductField::Image`] when no image data is attached.
    pub fn validate(&self) -> Result<(), ProductField> {
        if self.name.trim().is_empty() {
            return Err(ProductField::Name);
        }
        if self.description.trim().is_empty() {
            return Err(ProductField::Description);
        }
        match self.image.as_deref() {
            Some(image) if !image.is_empty() => Ok(()),
            _ => Err(ProductField::Image),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Anillo".to_string(),
            description: "Oro 18k".to_string(),
            image: Some("data:image/png;base64,AAAA".to_string()),
        }
    }

    #[test]
    fn test_valid_draft() {
        assert_eq!(draft().validate(), Ok(()));
    }

    #[test]
    fn test_whitespace_name_is_missing() {
        let d = ProductDraft {
            name: "  ".to_string(),
            ..draft()
        };
        assert_eq!(d.validate(), Err(ProductField::Name));
    }

    #[test]
    fn test_missing_image() {
        let d = ProductDraft {
            image: None,
            ..draft()
        };
        assert_eq!(d.validate(), Err(ProductField::Image));

        let d = ProductDraft {
            image: Some(String::new()),
            ..draft()
        };
        assert_eq!(d.validate(), Err(ProductField::Image));
    }

    #[test]
    fn test_reads_legacy_keys() {
        let listing: ProductListing = serde_json::from_str(
            r#"{"id": 5, "name": "Collar", "desc": "Plata", "img": "data:x", "createdAt": 5}"#,
        )
        .unwrap();
        assert_eq!(listing.description, "Plata");
        assert_eq!(listing.image, "data:x");
    }

    #[test]
    fn test_missing_created_at_defaults_to_zero() {
        let listing: ProductListing = serde_json::from_str(
            r#"{"id": 5, "name": "Collar", "description": "Plata", "image": "data:x"}"#,
        )
        .unwrap();
        assert_eq!(listing.created_at, 0);
    }
}
