//! Domain services.
//!
//! One service per entity, each a thin set of verbs over the gateway:
//!
//! - [`RestaurantService`] - restaurant lookup, settings, logo, admin membership
//! - [`CategoryService`] - menu sections
//! - [`ProductService`] - dishes and drinks, with image upload
//!
//! Services borrow the gateway and settings from a [`Services`] bundle, the
//! same way repositories borrow a connection pool.

mod category;
mod product;
mod restaurant;

use std::sync::Arc;

use qr_menu_core::{DEFAULT_PLACEHOLDER_IMAGE, ImageUpload};

use crate::gateway::{AccessToken, Gateway};

pub use category::CategoryService;
pub use product::ProductService;
pub use restaurant::{LookupError, RestaurantService};

/// Default storage bucket for logos and product images.
pub const DEFAULT_STORAGE_BUCKET: &str = "restaurant-images";

/// Settings shared by all services.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Object storage bucket for uploads.
    pub storage_bucket: String,
    /// Image URL used for products without one.
    pub placeholder_image: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            storage_bucket: DEFAULT_STORAGE_BUCKET.to_string(),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

/// Gateway plus settings; hands out per-entity services.
#[derive(Debug, Clone)]
pub struct Services<G> {
    gateway: G,
    settings: Arc<ServiceSettings>,
}

impl<G: Gateway> Services<G> {
    #[must_use]
    pub fn new(gateway: G, settings: ServiceSettings) -> Self {
        Self {
            gateway,
            settings: Arc::new(settings),
        }
    }

    /// The same services acting as the holder of `token`.
    #[must_use]
    pub fn with_access_token(&self, token: &AccessToken) -> Self {
        Self {
            gateway: self.gateway.with_access_token(token),
            settings: Arc::clone(&self.settings),
        }
    }

    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    #[must_use]
    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    #[must_use]
    pub fn restaurants(&self) -> RestaurantService<'_, G> {
        RestaurantService::new(&self.gateway, &self.settings)
    }

    #[must_use]
    pub fn categories(&self) -> CategoryService<'_, G> {
        CategoryService::new(&self.gateway)
    }

    #[must_use]
    pub fn products(&self) -> ProductService<'_, G> {
        ProductService::new(&self.gateway, &self.settings)
    }
}

/// Storage key for an upload: `{folder}/{prefix}_{millis}.{ext}`.
fn storage_key(folder: &str, prefix: &str, file: &ImageUpload) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    format!("{folder}/{prefix}_{millis}.{}", file.extension())
}
