//! Admin contact editing.

use axum::{Form, extract::State, response::Redirect};
use tracing::instrument;

use vadaf_core::ContactDraft;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::routes::{Flash, redirect_with_flash};
use crate::state::AppState;

/// Shown after the contact form is saved.
pub const CONTACTS_SAVED: &str = "Contactos guardados.";
/// Shown after the defaults are restored.
pub const DEFAULTS_LOADED: &str = "Valores predeterminados cargados.";

/// Save the contact form. Blank fields fall back to the defaults.
#[instrument(skip(_admin, state, draft))]
pub async fn save(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Form(draft): Form<ContactDraft>,
) -> Result<Redirect> {
    state.contacts().save_contacts(draft).await?;
    add_breadcrumb("contacts", "Contacts saved");
    Ok(redirect_with_flash("/admin", Flash::Success(CONTACTS_SAVED)))
}

/// Restore the built-in contact details.
#[instrument(skip(_admin, state))]
pub async fn restore_defaults(_admin: RequireAdmin, State(state): State<AppState>) -> Result<Redirect> {
    state.contacts().reset_contacts().await?;
    add_breadcrumb("contacts", "Contacts reset to defaults");
    Ok(redirect_with_flash("/admin", Flash::Success(DEFAULTS_LOADED)))
}
