//! Admin product publishing and deletion.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use vadaf_core::{CatalogError, Page, ProductId, ProductListing};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::{Flash, Layout, redirect_with_flash};
use crate::state::AppState;
use crate::upload::read_product_form;

/// Shown when name, description or image is missing.
pub const PRODUCT_INCOMPLETE: &str = "Completa los campos del producto.";
/// Shown after a listing is published.
pub const PRODUCT_ADDED: &str = "Publicación agregada.";
/// Shown after a listing is deleted.
pub const PRODUCT_DELETED: &str = "Publicación eliminada.";

/// Delete confirmation form.
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirm: Option<String>,
}

impl DeleteForm {
    fn confirmed(&self) -> bool {
        self.confirm.as_deref() == Some("yes")
    }
}

/// Delete confirmation page.
#[derive(Template, WebTemplate)]
#[template(path = "admin/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub layout: Layout,
    pub product: ProductListing,
}

/// Publish a new listing from the multipart product form.
///
/// An incomplete form redirects back with an error and stores nothing.
#[instrument(skip(_admin, state, multipart))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect> {
    let draft = read_product_form(multipart).await?;

    match state.catalog().add_product(draft).await {
        Ok(listing) => {
            add_breadcrumb("catalog", &format!("Published listing {}", listing.id));
            Ok(redirect_with_flash("/admin", Flash::Success(PRODUCT_ADDED)))
        }
        Err(CatalogError::Validation(field)) => {
            tracing::debug!(%field, "Product form incomplete");
            Ok(redirect_with_flash("/admin", Flash::Error(PRODUCT_INCOMPLETE)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Ask for confirmation before deleting a listing.
#[instrument(skip(_admin, state))]
pub async fn confirm_delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<ConfirmDeleteTemplate> {
    let product = state
        .catalog()
        .get_product(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ConfirmDeleteTemplate {
        layout: Layout::load(&state, Page::Admin).await,
        product,
    })
}

/// Delete a listing once confirmed.
///
/// Without `confirm=yes` nothing changes. Deleting an id that is already
/// gone still reports success.
#[instrument(skip(_admin, state))]
pub async fn delete(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect> {
    if !form.confirmed() {
        return Ok(Redirect::to("/admin"));
    }

    let removed = state.catalog().delete_product(id).await?;
    tracing::info!(%id, removed, "Delete requested");
    add_breadcrumb("catalog", &format!("Deleted listing {id}"));
    Ok(redirect_with_flash("/admin", Flash::Success(PRODUCT_DELETED)))
}
