//! Focus-refresh endpoint.
//!
//! When a tab regains focus the site script asks which regions of the page
//! are stale and refetches each one from its fragment endpoint.

use axum::{Json, extract::Query};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use vadaf_core::{AdminState, Page, Surface, SyncEvent, surfaces_for};

use crate::session_store::admin_state;

/// `GET /sync` query.
#[derive(Debug, Deserialize)]
pub struct SyncQuery {
    pub page: Page,
    #[serde(default = "default_event")]
    pub event: SyncEvent,
}

const fn default_event() -> SyncEvent {
    SyncEvent::FocusRegained
}

/// One region to refresh.
#[derive(Debug, Serialize)]
pub struct SurfaceRef {
    pub surface: Surface,
    /// Element whose contents are replaced.
    pub element_id: &'static str,
    /// Fragment endpoint rendering the new contents.
    pub url: &'static str,
}

impl From<Surface> for SurfaceRef {
    fn from(surface: Surface) -> Self {
        Self {
            surface,
            element_id: surface.element_id(),
            url: surface.fragment_path(),
        }
    }
}

/// `GET /sync` response.
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub state: AdminState,
    pub surfaces: Vec<SurfaceRef>,
}

/// List the surfaces to refresh on `page` after `event`.
#[instrument(skip(session))]
pub async fn sync(session: Session, Query(query): Query<SyncQuery>) -> Json<SyncResponse> {
    let state = admin_state(&session).await;
    let surfaces = surfaces_for(query.event, query.page, state)
        .into_iter()
        .map(SurfaceRef::from)
        .collect();

    Json(SyncResponse { state, surfaces })
}
