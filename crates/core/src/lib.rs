//! QR Menu Core - Shared types library.
//!
//! This crate provides common types used across all QR menu components:
//! - `admin` - Restaurant dashboard (owners and editors)
//! - `storefront` - Public bilingual menu viewer
//! - `cli` - Operator tooling
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Records are
//! loaded and persisted by `qr-menu-data`; the types here are what every
//! other layer works with after defaults have been resolved.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, prices, roles and languages
//! - [`models`] - Restaurant, admin, category and product records plus drafts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
