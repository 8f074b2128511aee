//! Admin gate extractor.
//!
//! Admin mutations and fragments take [`RequireAdmin`] as an argument; the
//! request only reaches the handler when the visitor's session flag is set.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::session_store::admin_flag;

/// Extractor that requires the admin session flag.
///
/// Page requests without the flag are redirected to `/admin` (which shows
/// the login form); fragment requests get 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(session): RequireAdmin) -> impl IntoResponse {
///     "only admins see this"
/// }
/// ```
pub struct RequireAdmin(pub Session);

/// Rejection when the admin flag is not set.
pub enum AdminRejection {
    /// Redirect to the login form (for page requests).
    RedirectToLogin,
    /// Unauthorized response (for fragment requests).
    Unauthorized,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/admin").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Nested routers see a stripped URI
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path(), |original| original.path());
        let is_fragment = path.starts_with("/admin/fragments/");
        let reject = || {
            if is_fragment {
                AdminRejection::Unauthorized
            } else {
                AdminRejection::RedirectToLogin
            }
        };

        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().cloned().ok_or_else(reject)?;

        if admin_flag(&session).is_authenticated().await {
            Ok(Self(session))
        } else {
            Err(reject())
        }
    }
}
