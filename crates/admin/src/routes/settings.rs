//! Restaurant settings panel: names, default language, logo.

use axum::{
    Form, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    response::{IntoResponse, Redirect, Response},
    routing::post,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;
use crate::view_model::SettingsForm;

use super::{MAX_UPLOAD_BYTES, MultipartForm, current_dashboard, store_dashboard};

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/settings", post(update))
        .route(
            "/settings/logo",
            post(upload_logo).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}

/// POST /settings
#[instrument(skip(state, session, admin, form))]
async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Form(form): Form<SettingsForm>,
) -> Result<Response, AppError> {
    let mut vm = current_dashboard(&state, &session, &admin).await?;
    vm.save_settings(&state.services_for(&admin.access_token), &form)
        .await;
    store_dashboard(&session, &vm).await?;
    Ok(Redirect::to("/").into_response())
}

/// POST /settings/logo (multipart)
#[instrument(skip(state, session, admin, multipart))]
async fn upload_logo(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let body = MultipartForm::read(multipart, "logo").await?;
    let Some(file) = body.file else {
        return Err(AppError::BadRequest("no logo file".to_string()));
    };

    let mut vm = current_dashboard(&state, &session, &admin).await?;
    vm.upload_logo(&state.services_for(&admin.access_token), &file)
        .await;
    store_dashboard(&session, &vm).await?;
    Ok(Redirect::to("/").into_response())
}
