//! View synchronization rules and hidden admin gestures.
//!
//! Pages are rendered from the store on every request, so keeping them in
//! sync is a matter of knowing which surfaces to redraw after each event.
//! [`surfaces_for`] answers that; the storefront uses it both for the first
//! render of a page and for the focus-refresh endpoint.

use serde::{Deserialize, Serialize};

use crate::session::AdminState;

/// Window within which a second tap counts as a double tap.
pub const DOUBLE_TAP_WINDOW_MS: i64 = 400;

/// Something that may require re-rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncEvent {
    InitialLoad,
    FocusRegained,
    CatalogChanged,
    ContactsChanged,
    LoggedIn,
    LoggedOut,
}

/// The page the visitor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Home,
    Catalog,
    Admin,
}

/// An independently renderable region of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Surface {
    /// Public contact panel (every page).
    ContactDisplay,
    /// Admin contact edit form.
    ContactForm,
    /// Public product grid.
    CatalogGrid,
    /// Admin product list with delete buttons.
    AdminList,
}

impl Surface {
    /// DOM element id the surface is rendered into.
    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::ContactDisplay => "contactDetails",
            Self::ContactForm => "contactForm",
            Self::CatalogGrid => "catalogGrid",
            Self::AdminList => "adminList",
        }
    }

    /// Path of the fragment endpoint that renders the surface.
    #[must_use]
    pub const fn fragment_path(self) -> &'static str {
        match self {
            Self::ContactDisplay => "/fragments/contacts",
            Self::ContactForm => "/admin/fragments/contacts",
            Self::CatalogGrid => "/fragments/catalog",
            Self::AdminList => "/admin/fragments/list",
        }
    }

    /// Whether the surface is only shown to a logged-in admin.
    #[must_use]
    pub const fn requires_admin(self) -> bool {
        matches!(self, Self::ContactForm | Self::AdminList)
    }
}

/// Surfaces to redraw on `page` after `event`, given the admin `state`.
///
/// Admin surfaces only appear on the admin page while logged in; the
/// catalog grid only on the catalog page; the contact panel everywhere.
#[must_use]
pub fn surfaces_for(event: SyncEvent, page: Page, state: AdminState) -> Vec<Surface> {
    let contacts = matches!(
        event,
        SyncEvent::InitialLoad | SyncEvent::FocusRegained | SyncEvent::ContactsChanged
    );
    let catalog = matches!(
        event,
        SyncEvent::InitialLoad | SyncEvent::FocusRegained | SyncEvent::CatalogChanged
    );
    let admin = page == Page::Admin && state.is_logged_in();
    let entered_admin = event == SyncEvent::LoggedIn;

    let mut surfaces = Vec::new();
    if contacts {
        surfaces.push(Surface::ContactDisplay);
    }
    if catalog && page == Page::Catalog {
        surfaces.push(Surface::CatalogGrid);
    }
    if admin && (contacts || entered_admin) {
        surfaces.push(Surface::ContactForm);
    }
    if admin && (catalog || entered_admin) {
        surfaces.push(Surface::AdminList);
    }
    surfaces
}

/// Detects a double tap on the hidden admin trigger.
///
/// Fires when a tap lands within the window of the previous one, then
/// forgets that pair so a third quick tap starts over.
///
/// The browser runs the same rules in `static/js/site.js` of the storefront,
/// reading the window and [`ADMIN_CHORD`] from the page's `data-*`
/// attributes. Keep the two in step when changing either.
#[derive(Debug, Clone)]
pub struct TapDetector {
    window_ms: i64,
    last_tap_ms: Option<i64>,
}

impl Default for TapDetector {
    fn default() -> Self {
        Self::new(DOUBLE_TAP_WINDOW_MS)
    }
}

impl TapDetector {
    #[must_use]
    pub const fn new(window_ms: i64) -> Self {
        Self {
            window_ms,
            last_tap_ms: None,
        }
    }

    /// Register a tap at `at_ms`. Returns `true` when it completes a double tap.
    pub fn tap(&mut self, at_ms: i64) -> bool {
        match self.last_tap_ms {
            Some(previous) if (0..=self.window_ms).contains(&(at_ms - previous)) => {
                self.last_tap_ms = None;
                true
            }
            _ => {
                self.last_tap_ms = Some(at_ms);
                false
            }
        }
    }
}

/// A key press as reported by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

/// A keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyChord {
    pub key: char,
    pub ctrl: bool,
    pub shift: bool,
}

/// Ctrl+Shift+A opens the admin panel.
pub const ADMIN_CHORD: KeyChord = KeyChord {
    key: 'a',
    ctrl: true,
    shift: true,
};

impl KeyChord {
    /// Whether `press` triggers this chord. The key is case-insensitive
    /// because Shift usually uppercases it; extra Alt never matches.
    #[must_use]
    pub fn matches(&self, press: &KeyPress) -> bool {
        let mut chars = press.key.chars();
        let single = matches!((chars.next(), chars.next()), (Some(c), None) if c.eq_ignore_ascii_case(&self.key));
        single && press.ctrl == self.ctrl && press.shift == self.shift && !press.alt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taps_200ms_apart_fire_once() {
        let mut detector = TapDetector::default();
        let fired: Vec<bool> = [1_000, 1_200].into_iter().map(|t| detector.tap(t)).collect();
        assert_eq!(fired, [false, true]);
    }

    #[test]
    fn test_taps_500ms_apart_do_not_fire() {
        let mut detector = TapDetector::default();
        assert!(!detector.tap(1_000));
        assert!(!detector.tap(1_500));
    }

    #[test]
    fn test_window_is_inclusive() {
        let mut detector = TapDetector::default();
        detector.tap(0);
        assert!(detector.tap(400));
    }

    #[test]
    fn test_resets_after_firing() {
        let mut detector = TapDetector::default();
        assert!(!detector.tap(0));
        assert!(detector.tap(100));
        assert!(!detector.tap(200));
        assert!(detector.tap(300));
    }

    #[test]
    fn test_slow_tap_becomes_new_first_tap() {
        let mut detector = TapDetector::default();
        detector.tap(0);
        assert!(!detector.tap(1_000));
        assert!(detector.tap(1_300));
    }

    #[test]
    fn test_admin_chord() {
        let press = |key: &str, ctrl, shift, alt| KeyPress {
            key: key.to_string(),
            ctrl,
            shift,
            alt,
        };
        assert!(ADMIN_CHORD.matches(&press("A", true, true, false)));
        assert!(ADMIN_CHORD.matches(&press("a", true, true, false)));
        assert!(!ADMIN_CHORD.matches(&press("a", true, false, false)));
        assert!(!ADMIN_CHORD.matches(&press("a", false, true, false)));
        assert!(!ADMIN_CHORD.matches(&press("a", true, true, true)));
        assert!(!ADMIN_CHORD.matches(&press("ArrowUp", true, true, false)));
    }

    #[test]
    fn test_initial_load_on_catalog_page() {
        assert_eq!(
            surfaces_for(SyncEvent::InitialLoad, Page::Catalog, AdminState::LoggedOut),
            [Surface::ContactDisplay, Surface::CatalogGrid]
        );
    }

    #[test]
    fn test_admin_surfaces_require_login() {
        let logged_out = surfaces_for(SyncEvent::FocusRegained, Page::Admin, AdminState::LoggedOut);
        assert_eq!(logged_out, [Surface::ContactDisplay]);

        let logged_in = surfaces_for(SyncEvent::FocusRegained, Page::Admin, AdminState::LoggedIn);
        assert_eq!(
            logged_in,
            [Surface::ContactDisplay, Surface::ContactForm, Surface::AdminList]
        );
    }

    #[test]
    fn test_catalog_change_targets_grid_and_admin_list() {
        assert_eq!(
            surfaces_for(SyncEvent::CatalogChanged, Page::Catalog, AdminState::LoggedIn),
            [Surface::CatalogGrid]
        );
        assert_eq!(
            surfaces_for(SyncEvent::CatalogChanged, Page::Admin, AdminState::LoggedIn),
            [Surface::AdminList]
        );
    }

    #[test]
    fn test_login_and_logout_events() {
        assert_eq!(
            surfaces_for(SyncEvent::LoggedIn, Page::Admin, AdminState::LoggedIn),
            [Surface::ContactForm, Surface::AdminList]
        );
        assert!(surfaces_for(SyncEvent::LoggedOut, Page::Admin, AdminState::LoggedOut).is_empty());
    }

    #[test]
    fn test_home_page_never_gets_the_grid() {
        let surfaces = surfaces_for(SyncEvent::FocusRegained, Page::Home, AdminState::LoggedIn);
        assert_eq!(surfaces, [Surface::ContactDisplay]);
        assert!(surfaces.iter().all(|s| !s.requires_admin()));
    }
}
