//! Data access for the QR menu.
//!
//! # Layers
//!
//! - [`gateway`] - the hosted data store: tables, auth, object storage
//! - [`rows`] - raw rows to domain records, defaults applied once
//! - [`api`] - uniform [`ApiResult`] with localized failure messages
//! - [`services`] - per-entity verbs used by the dashboard, the menu and the CLI
//! - [`generation`] - per-visitor load generations for discarding stale loads
//!
//! # Example
//!
//! ```rust,ignore
//! use qr_menu_data::gateway::{SupabaseConfig, SupabaseGateway};
//! use qr_menu_data::services::{ServiceSettings, Services};
//!
//! let gateway = SupabaseGateway::new(&config)?;
//! let services = Services::new(gateway, ServiceSettings::default());
//! let categories = services.categories().list(&restaurant_id, true).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod gateway;
pub mod generation;
pub mod rows;
pub mod services;

pub use api::{ApiError, ApiErrorKind, ApiResult};
pub use gateway::{Gateway, GatewayError};
pub use generation::Generations;
pub use services::{LookupError, ServiceSettings, Services};
