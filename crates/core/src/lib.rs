//! Vadaf Core - catalog store and admin synchronization logic.
//!
//! This crate provides everything the storefront and CLI share:
//! - `storefront` - Public catalog and the hidden `/admin` panel
//! - `cli` - Command-line tools for inspecting and editing the data file
//!
//! # Architecture
//!
//! All state lives behind the [`store::KeyValueStore`] trait: string keys,
//! JSON values. Components take the store as an injected dependency so tests
//! can swap in [`store::MemoryStore`]. No HTTP lives here.
//!
//! # Modules
//!
//! - [`types`] - Product listings, contact record, ids
//! - [`store`] - Key-value store adapter and its implementations
//! - [`contacts`] - Contact record manager and its display projections
//! - [`catalog`] - Product catalog store with pluggable id generation
//! - [`session`] - The admin session flag and fixed credentials
//! - [`sync`] - Which surfaces re-render on which event, hidden gestures

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod contacts;
pub mod session;
pub mod store;
pub mod sync;
pub mod types;

pub use catalog::{Catalog, CatalogError, IdGenerator, SequentialIds, TimestampIds};
pub use contacts::{ContactBook, ContactDisplay, ContactForm};
pub use session::{AdminState, SessionFlag};
#[cfg(feature = "file-store")]
pub use store::FileStore;
pub use store::{KeyValueStore, MemoryStore, StoreError};
pub use sync::{Page, Surface, SyncEvent, TapDetector, surfaces_for};
pub use types::*;
