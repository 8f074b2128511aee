//! Vadaf Joyería storefront library.
//!
//! The public catalog, contact panel and hidden admin panel as an axum
//! application. Exposed as a library so the integration tests can drive
//! [`routes::app`] directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod session_store;
pub mod state;
pub mod upload;
