//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Home page
//! GET  /health                        - Health check
//! GET  /static/*                      - CSS and site script
//!
//! # Public catalog
//! GET  /catalog                       - Product grid
//! GET  /fragments/catalog             - Product grid fragment
//! GET  /fragments/contacts            - Contact panel fragment
//! GET  /sync?page=&event=             - Surfaces to refetch (JSON)
//!
//! # Admin (hidden: Ctrl+Shift+A or double tap on the logo)
//! GET  /admin                         - Login form or admin panel
//! POST /admin/login                   - Login action
//! POST /admin/logout                  - Logout action
//! POST /admin/products                - Publish a listing (multipart)
//! GET  /admin/products/{id}/delete    - Delete confirmation page
//! POST /admin/products/{id}/delete    - Delete action
//! POST /admin/contacts                - Save contact details
//! POST /admin/contacts/defaults       - Restore default contact details
//! GET  /admin/fragments/list          - Admin product list fragment
//! GET  /admin/fragments/contacts      - Contact form fields fragment
//! ```

pub mod admin;
pub mod catalog;
pub mod contacts;
pub mod home;
pub mod products;
pub mod sync;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    middleware::from_fn,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};

use vadaf_core::sync::{ADMIN_CHORD, DOUBLE_TAP_WINDOW_MS};
use vadaf_core::{ContactDisplay, Page};

use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

// =============================================================================
// Shared View Types
// =============================================================================

/// Query parameters for flash messages after a redirect.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Hidden admin gesture settings rendered into `<body data-*>` for the
/// site script.
#[derive(Debug, Clone, Copy)]
pub struct GestureConfig {
    pub tap_window_ms: i64,
    pub chord_key: char,
    pub chord_ctrl: bool,
    pub chord_shift: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_window_ms: DOUBLE_TAP_WINDOW_MS,
            chord_key: ADMIN_CHORD.key,
            chord_ctrl: ADMIN_CHORD.ctrl,
            chord_shift: ADMIN_CHORD.shift,
        }
    }
}

/// Fields every page passes to `base.html`.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Navigation key of the current page (`home`, `catalog`, `admin`).
    pub page: &'static str,
    pub contact: ContactDisplay,
    pub gesture: GestureConfig,
}

impl Layout {
    /// Load the contact panel for `page`.
    pub async fn load(state: &AppState, page: Page) -> Self {
        let record = state.contacts().load_contacts().await;
        Self {
            page: match page {
                Page::Home => "home",
                Page::Catalog => "catalog",
                Page::Admin => "admin",
            },
            contact: ContactDisplay::from(&record),
            gesture: GestureConfig::default(),
        }
    }
}

/// A flash message carried across a redirect.
#[derive(Debug, Clone, Copy)]
pub enum Flash<'a> {
    Success(&'a str),
    Error(&'a str),
}

/// Redirect to `path` with a flash message in the query string.
#[must_use]
pub fn redirect_with_flash(path: &str, flash: Flash<'_>) -> Redirect {
    let (key, message) = match flash {
        Flash::Success(message) => ("success", message),
        Flash::Error(message) => ("error", message),
    };
    Redirect::to(&format!("{path}?{key}={}", urlencoding::encode(message)))
}

// =============================================================================
// Router
// =============================================================================

/// Admin routes, nested under `/admin`.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/login", post(admin::login))
        .route("/logout", post(admin::logout))
        .route("/products", post(products::create))
        .route(
            "/products/{id}/delete",
            get(products::confirm_delete).post(products::delete),
        )
        .route("/contacts", post(contacts::save))
        .route("/contacts/defaults", post(contacts::restore_defaults))
        .route("/fragments/list", get(admin::list_fragment))
        .route("/fragments/contacts", get(admin::contact_form_fragment))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/catalog", get(catalog::index))
        .route("/fragments/catalog", get(catalog::grid_fragment))
        .route("/fragments/contacts", get(catalog::contacts_fragment))
        .route("/sync", get(sync::sync))
        .nest("/admin", admin_routes())
}

/// Build the full application: routes, static files and middleware.
///
/// Sentry layers are added on top of this in `main`.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let body_limit = DefaultBodyLimit::max(state.config().max_upload_bytes);
    let static_files = ServeDir::new(&state.config().static_dir);

    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = tracing::field::Empty,
        )
    });

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", static_files)
        .layer(body_limit)
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(trace_layer)
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{StatusCode, header::LOCATION};
    use axum::response::IntoResponse;
    use tower::ServiceExt;
    use vadaf_core::MemoryStore;

    use super::*;
    use crate::config::StorefrontConfig;

    fn get_request(uri: &str) -> Request {
        axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn test_app() -> Router {
        let config = StorefrontConfig::from_lookup(|_| None).unwrap();
        app(AppState::new(config, Arc::new(MemoryStore::new())))
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = test_app()
            .oneshot(get_request("/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = test_app()
            .oneshot(get_request("/cart"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_flash_is_url_encoded() {
        let response =
            redirect_with_flash("/admin", Flash::Success("Publicación agregada.")).into_response();
        assert_eq!(
            response.headers()[LOCATION],
            "/admin?success=Publicaci%C3%B3n%20agregada."
        );
    }

    #[test]
    fn test_gesture_defaults() {
        let gesture = GestureConfig::default();
        assert_eq!(gesture.tap_window_ms, 400);
        assert_eq!(gesture.chord_key, 'a');
        assert!(gesture.chord_ctrl && gesture.chord_shift);
    }

    #[test]
    fn test_site_script_reads_gesture_attributes() {
        let script = include_str!("../../static/js/site.js");
        for attribute in ["tapWindow", "chordKey", "chordCtrl", "chordShift"] {
            assert!(
                script.contains(&format!("body.dataset.{attribute}")),
                "site.js does not read data-{attribute}"
            );
        }
        // Inclusive window, reset after firing
        assert!(script.contains("now - lastTap <= tapWindow"));
        assert!(script.contains("lastTap = null;\n        goToAdmin();"));
    }
}
