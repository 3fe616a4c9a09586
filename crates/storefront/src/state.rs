//! Application state shared across handlers.

use std::sync::Arc;

use qr_menu_data::gateway::{GatewayError, SupabaseGateway};
use qr_menu_data::{Generations, Services};

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The menu is public, so every visitor shares
/// one anonymous gateway.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    services: Services<SupabaseGateway>,
    generations: Generations,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, GatewayError> {
        let gateway = SupabaseGateway::new(&config.supabase)?;
        let services = Services::new(gateway, config.service_settings());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                services,
                generations: Generations::default(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn services(&self) -> &Services<SupabaseGateway> {
        &self.inner.services
    }

    /// Load generations per visitor page key.
    #[must_use]
    pub fn generations(&self) -> &Generations {
        &self.inner.generations
    }
}
