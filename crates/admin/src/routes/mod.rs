//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! # Auth (Supabase email + password)
//! GET  /auth/login               - Login page
//! POST /auth/login               - Sign in
//! POST /auth/logout              - Sign out
//!
//! # Dashboard
//! GET  /                         - Dashboard (?reload=1 re-enters)
//! GET  /products?category=&q=    - Filter the product list
//! POST /modal/close              - Close the open modal
//! POST /confirm                  - Run the pending destructive action
//!
//! # Categories
//! GET  /categories/new           - Open the blank category form
//! GET  /categories/{id}/edit     - Open the form for a category
//! GET  /categories/{id}/delete   - Ask to confirm deleting a category
//! POST /categories               - Save the category form
//!
//! # Products
//! GET  /products/new             - Open the blank product form
//! GET  /products/{id}/edit       - Open the form for a product
//! GET  /products/{id}/delete     - Ask to confirm deleting a product
//! POST /products                 - Save the product form (multipart, optional image)
//!
//! # Admins (owner only)
//! GET  /admins/new               - Open the invite form
//! GET  /admins/{id}/delete       - Ask to confirm removing an admin
//! POST /admins                   - Invite an admin
//!
//! # Settings
//! POST /settings                 - Save restaurant names and default language
//! POST /settings/logo            - Upload a new logo (multipart)
//! ```
//!
//! Every dashboard handler loads the session snapshot, applies one action
//! and stores the snapshot again. Form posts redirect back to `/`.

pub mod admins;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod products;
pub mod settings;

use askama::Template;
use axum::Router;
use axum::extract::Multipart;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tower_sessions::Session;

use qr_menu_core::ImageUpload;
use qr_menu_data::Generations;

use crate::error::AppError;
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;
use crate::view_model::{AdminViewModel, Phase};

use dashboard::{DashboardTemplate, ErrorTemplate};

/// Largest accepted upload body (images).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Build the full admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(admins::router())
        .merge(settings::router())
}

/// Per-visitor key for load generations, created on first use.
async fn page_key(session: &Session) -> Result<String, AppError> {
    if let Some(key) = session.get::<String>(session_keys::PAGE_KEY).await? {
        return Ok(key);
    }
    let key = uuid::Uuid::new_v4().to_string();
    session.insert(session_keys::PAGE_KEY, &key).await?;
    Ok(key)
}

/// Build a fresh dashboard for `admin`.
///
/// The snapshot is stored only if no newer entry for the same visitor
/// started while this one was loading.
pub async fn enter_dashboard(
    state: &AppState,
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<AdminViewModel, AppError> {
    let key = page_key(session).await?;
    let generation = state.generations().begin(&key).await;

    let vm = AdminViewModel::enter(&state.services_for(&admin.access_token)).await;

    store_dashboard_if_current(state.generations(), session, &key, generation, &vm).await?;
    Ok(vm)
}

/// Store `vm` only if `generation` is still the newest load for `key`.
async fn store_dashboard_if_current(
    generations: &Generations,
    session: &Session,
    key: &str,
    generation: u64,
    vm: &AdminViewModel,
) -> Result<bool, AppError> {
    if !generations.is_current(key, generation).await {
        tracing::debug!(generation, "discarding stale dashboard load");
        return Ok(false);
    }
    store_dashboard(session, vm).await?;
    Ok(true)
}

/// The stored dashboard, if the visitor has entered it.
pub async fn load_dashboard(session: &Session) -> Result<Option<AdminViewModel>, AppError> {
    Ok(session.get(session_keys::DASHBOARD).await?)
}

pub async fn store_dashboard(session: &Session, vm: &AdminViewModel) -> Result<(), AppError> {
    session.insert(session_keys::DASHBOARD, vm).await?;
    Ok(())
}

/// Stored dashboard, entering it first when there is none.
pub async fn current_dashboard(
    state: &AppState,
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<AdminViewModel, AppError> {
    match load_dashboard(session).await? {
        Some(vm) => Ok(vm),
        None => enter_dashboard(state, session, admin).await,
    }
}

/// Render the dashboard page for `vm` according to its phase.
///
/// Notices are shown once: they are cleared from the stored snapshot.
pub async fn render_dashboard(
    state: &AppState,
    session: &Session,
    mut vm: AdminViewModel,
) -> Result<Response, AppError> {
    match vm.phase.clone() {
        Phase::Unauthenticated => {
            crate::middleware::clear_current_admin(session).await?;
            Ok(Redirect::to("/auth/login").into_response())
        }
        Phase::Error(message) => {
            let template = ErrorTemplate {
                message,
                email: vm.user_email.as_ref().map(ToString::to_string).unwrap_or_default(),
            };
            Ok(Html(
                template
                    .render()
                    .unwrap_or_else(|e| format!("Template error: {e}")),
            )
            .into_response())
        }
        Phase::Loading | Phase::Ready => {
            let view = vm.view(&state.config().menu_base_url);
            vm.take_notices();
            store_dashboard(session, &vm).await?;
            let template = DashboardTemplate { view };
            Ok(Html(
                template
                    .render()
                    .unwrap_or_else(|e| format!("Template error: {e}")),
            )
            .into_response())
        }
    }
}

/// Apply `action` to the stored dashboard, store it and render it.
pub async fn with_dashboard(
    state: &AppState,
    session: &Session,
    admin: &CurrentAdmin,
    action: impl FnOnce(&mut AdminViewModel),
) -> Result<Response, AppError> {
    let mut vm = current_dashboard(state, session, admin).await?;
    action(&mut vm);
    render_dashboard(state, session, vm).await
}

/// Multipart text fields plus an optional file part.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: std::collections::HashMap<String, String>,
    pub file: Option<ImageUpload>,
}

impl MultipartForm {
    /// Read every part; `file_field` names the file input. An empty file
    /// input (nothing chosen) yields no file.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] for a malformed body.
    pub async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self, AppError> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == file_field {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    form.file = Some(ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    /// Text field value, empty when absent.
    #[must_use]
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// Checkbox value: present when ticked.
    #[must_use]
    pub fn checkbox(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_stale_dashboard_load_is_not_stored() {
        let generations = Generations::default();
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let key = page_key(&session).await.unwrap();

        let older = generations.begin(&key).await;
        let newer = generations.begin(&key).await;

        let stale = AdminViewModel {
            phase: Phase::Unauthenticated,
            ..AdminViewModel::default()
        };
        let fresh = AdminViewModel {
            phase: Phase::Ready,
            notices: vec!["fresh".to_string()],
            ..AdminViewModel::default()
        };

        assert!(!store_dashboard_if_current(&generations, &session, &key, older, &stale)
            .await
            .unwrap());
        assert_eq!(load_dashboard(&session).await.unwrap(), None);

        assert!(store_dashboard_if_current(&generations, &session, &key, newer, &fresh)
            .await
            .unwrap());
        assert!(!store_dashboard_if_current(&generations, &session, &key, older, &stale)
            .await
            .unwrap());
        assert_eq!(load_dashboard(&session).await.unwrap(), Some(fresh));
    }
}
