//! Product upload form parsing.
//!
//! The admin product form is `multipart/form-data` with `name`,
//! `description` and an `image` file. The image is embedded into the
//! listing as a base64 `data:` URL.

use axum::extract::Multipart;
use base64::{Engine, engine::general_purpose::STANDARD};

use vadaf_core::ProductDraft;

use crate::error::Result;

/// Read the product form into a draft.
///
/// Missing or empty fields are left blank for catalog validation to report;
/// unknown fields are ignored.
///
/// # Errors
///
/// Returns an error if the multipart body is malformed or exceeds the body
/// limit.
pub async fn read_product_form(mut multipart: Multipart) -> Result<ProductDraft> {
    let mut draft = ProductDraft::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => draft.name = field.text().await?,
            "description" => draft.description = field.text().await?,
            "image" => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                draft.image = image_data_url(content_type.as_deref(), &bytes);
                tracing::debug!(
                    file_name = file_name.as_deref().unwrap_or(""),
                    size = bytes.len(),
                    accepted = draft.image.is_some(),
                    "Received product image"
                );
            }
            _ => {}
        }
    }

    Ok(draft)
}

/// Encode an uploaded image as a `data:` URL.
///
/// Returns `None` for an empty upload (the browser sends an empty part when
/// no file was chosen) or a content type that is not `image/*`.
#[must_use]
pub fn image_data_url(content_type: Option<&str>, bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    let mime = content_type?.trim();
    if !mime.starts_with("image/") {
        return None;
    }
    Some(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_becomes_data_url() {
        let url = image_data_url(Some("image/png"), b"\x89PNG");
        assert_eq!(url.as_deref(), Some("data:image/png;base64,iVBORw=="));
    }

    #[test]
    fn test_empty_upload_is_missing() {
        assert_eq!(image_data_url(Some("application/octet-stream"), b""), None);
        assert_eq!(image_data_url(Some("image/jpeg"), b""), None);
    }

    #[test]
    fn test_non_image_is_rejected() {
        assert_eq!(image_data_url(Some("text/html"), b"<script>"), None);
        assert_eq!(image_data_url(None, b"abc"), None);
    }
}
