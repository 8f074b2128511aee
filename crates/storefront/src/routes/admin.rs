//! Hidden admin panel: login, logout and the admin fragments.
//!
//! The panel is not linked from anywhere; visitors reach it through the
//! keyboard chord or a double tap on the logo (see `static/js/site.js`).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use vadaf_core::{ContactForm, Page, ProductListing, Surface, SyncEvent, surfaces_for};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::{Flash, Layout, MessageQuery, redirect_with_flash};
use crate::session_store::{admin_flag, admin_state};
use crate::state::AppState;

/// Shown when the username or password is wrong.
pub const LOGIN_FAILED: &str = "Usuario o contraseña incorrectos";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
///
/// Deliberately not `Debug`: the password must never reach the logs.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Admin page template: the login form, or the panel once logged in.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminTemplate {
    pub layout: Layout,
    pub logged_in: bool,
    pub products: Option<Vec<ProductListing>>,
    pub form: Option<ContactForm>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Admin product list fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/admin_list.html")]
pub struct AdminListTemplate {
    pub products: Vec<ProductListing>,
}

/// Admin contact form fields fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/contact_form.html")]
pub struct ContactFormTemplate {
    pub form: ContactForm,
}

// =============================================================================
// Page Routes
// =============================================================================

/// Display the login form or the admin panel.
#[instrument(skip(state, session, query))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> AdminTemplate {
    let admin = admin_state(&session).await;
    let surfaces = surfaces_for(SyncEvent::InitialLoad, Page::Admin, admin);

    let products = if surfaces.contains(&Surface::AdminList) {
        Some(state.catalog().list_products().await)
    } else {
        None
    };
    let form = if surfaces.contains(&Surface::ContactForm) {
        Some(ContactForm::from(&state.contacts().load_contacts().await))
    } else {
        None
    };

    AdminTemplate {
        layout: Layout::load(&state, Page::Admin).await,
        logged_in: admin.is_logged_in(),
        products,
        form,
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
///
/// A rejected attempt leaves the session flag untouched.
#[instrument(skip(session, form))]
pub async fn login(session: Session, Form(form): Form<LoginForm>) -> Result<Redirect> {
    let password = SecretString::from(form.password);

    if admin_flag(&session).login(&form.username, &password).await? {
        // New session id on privilege change
        session.cycle_id().await?;
        add_breadcrumb("admin", "Admin logged in");
        Ok(Redirect::to("/admin"))
    } else {
        Ok(redirect_with_flash("/admin", Flash::Error(LOGIN_FAILED)))
    }
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    admin_flag(&session).logout().await?;
    add_breadcrumb("admin", "Admin logged out");
    Ok(Redirect::to("/admin"))
}

// =============================================================================
// Fragment Routes
// =============================================================================

/// Admin product list fragment.
#[instrument(skip(state, _admin))]
pub async fn list_fragment(_admin: RequireAdmin, State(state): State<AppState>) -> AdminListTemplate {
    AdminListTemplate {
        products: state.catalog().list_products().await,
    }
}

/// Admin contact form fields fragment.
#[instrument(skip(state, _admin))]
pub async fn contact_form_fragment(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> ContactFormTemplate {
    ContactFormTemplate {
        form: ContactForm::from(&state.contacts().load_contacts().await),
    }
}
