//! Public catalog route handlers.
//!
//! The catalog page and the two public fragments the site script refetches
//! when the tab regains focus.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use vadaf_core::{ContactDisplay, Page, ProductListing};

use crate::filters;
use crate::routes::Layout;
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub layout: Layout,
    pub products: Vec<ProductListing>,
}

/// Product grid fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/catalog_grid.html")]
pub struct CatalogGridTemplate {
    pub products: Vec<ProductListing>,
}

/// Contact panel fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/contact_details.html")]
pub struct ContactDetailsTemplate {
    pub contact: ContactDisplay,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the catalog page, newest listings first.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> CatalogTemplate {
    let layout = Layout::load(&state, Page::Catalog).await;
    let products = state.catalog().list_products().await;

    CatalogTemplate { layout, products }
}

/// Product grid fragment.
#[instrument(skip(state))]
pub async fn grid_fragment(State(state): State<AppState>) -> CatalogGridTemplate {
    CatalogGridTemplate {
        products: state.catalog().list_products().await,
    }
}

/// Contact panel fragment.
#[instrument(skip(state))]
pub async fn contacts_fragment(State(state): State<AppState>) -> ContactDetailsTemplate {
    let record = state.contacts().load_contacts().await;
    ContactDetailsTemplate {
        contact: ContactDisplay::from(&record),
    }
}
