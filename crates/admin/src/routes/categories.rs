//! Category form and delete confirmation.

use axum::{
    Form, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::instrument;

use qr_menu_core::CategoryId;

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;
use crate::view_model::CategoryForm;

use super::{current_dashboard, store_dashboard, with_dashboard};

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", post(save))
        .route("/categories/new", get(new_form))
        .route("/categories/{id}/edit", get(edit_form))
        .route("/categories/{id}/delete", get(confirm_delete))
}

/// GET /categories/new
async fn new_form(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Response, AppError> {
    with_dashboard(&state, &session, &admin, |vm| {
        vm.open_category_form(None);
    })
    .await
}

/// GET /categories/{id}/edit
async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<CategoryId>,
) -> Result<Response, AppError> {
    with_dashboard(&state, &session, &admin, |vm| {
        if !vm.open_category_form(Some(&id)) {
            tracing::debug!(%id, "edit requested for unknown category");
        }
    })
    .await
}

/// GET /categories/{id}/delete
async fn confirm_delete(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<CategoryId>,
) -> Result<Response, AppError> {
    with_dashboard(&state, &session, &admin, |vm| {
        vm.request_delete_category(&id);
    })
    .await
}

/// Save the open category form.
///
/// POST /categories
#[instrument(skip(state, session, admin, form))]
async fn save(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Form(form): Form<CategoryForm>,
) -> Result<Response, AppError> {
    let mut vm = current_dashboard(&state, &session, &admin).await?;
    if !vm.begin_submit() {
        return Ok(Redirect::to("/").into_response());
    }
    store_dashboard(&session, &vm).await?;

    vm.save_category(&state.services_for(&admin.access_token), form)
        .await;
    store_dashboard(&session, &vm).await?;
    Ok(Redirect::to("/").into_response())
}
