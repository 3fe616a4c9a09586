//! Core types for the QR menu.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod lang;
pub mod price;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use lang::{Lang, LocalizedText};
pub use price::{Price, PriceError};
pub use role::AdminRole;
