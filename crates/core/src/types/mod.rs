//! Core types for the Vadaf storefront.
//!
//! This module provides the persisted domain records and their ids.

pub mod contact;
pub mod id;
pub mod product;

pub use contact::{ContactDraft, ContactRecord};
pub use id::ProductId;
pub use product::{ProductDraft, ProductField, ProductListing};
