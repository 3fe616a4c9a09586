//! Application state shared across handlers.

use std::sync::Arc;

use qr_menu_data::gateway::{AccessToken, GatewayError, SupabaseGateway};
use qr_menu_data::{Generations, Services};

use crate::config::AdminConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    services: Services<SupabaseGateway>,
    generations: Generations,
}

impl AppState {
    /// Build the state with an anonymous Supabase gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, GatewayError> {
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

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Anonymous services, used for sign-in.
    #[must_use]
    pub fn services(&self) -> &Services<SupabaseGateway> {
        &self.inner.services
    }

    /// Services acting as the signed-in admin.
    #[must_use]
    pub fn services_for(&self, token: &AccessToken) -> Services<SupabaseGateway> {
        self.inner.services.with_access_token(token)
    }

    #[must_use]
    pub fn generations(&self) -> &Generations {
        &self.inner.generations
    }
}
