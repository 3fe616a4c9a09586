//! Admin invitations and removal (owner only).

use axum::{
    Form, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::instrument;

use qr_menu_core::AdminId;

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;
use crate::view_model::InviteForm;

use super::{current_dashboard, store_dashboard, with_dashboard};

/// Build the admins router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admins", post(invite))
        .route("/admins/new", get(new_form))
        .route("/admins/{id}/delete", get(confirm_remove))
}

/// GET /admins/new
async fn new_form(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Response, AppError> {
    with_dashboard(&state, &session, &admin, |vm| {
        vm.open_invite_form();
    })
    .await
}

/// GET /admins/{id}/delete
async fn confirm_remove(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<AdminId>,
) -> Result<Response, AppError> {
    with_dashboard(&state, &session, &admin, |vm| {
        vm.request_remove_admin(&id);
    })
    .await
}

/// Invite an editor or manager.
///
/// POST /admins
#[instrument(skip(state, session, admin, form))]
async fn invite(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Form(form): Form<InviteForm>,
) -> Result<Response, AppError> {
    let mut vm = current_dashboard(&state, &session, &admin).await?;
    if !vm.begin_submit() {
        return Ok(Redirect::to("/").into_response());
    }
    store_dashboard(&session, &vm).await?;

    vm.invite_admin(&state.services_for(&admin.access_token), form)
        .await;
    store_dashboard(&session, &vm).await?;
    Ok(Redirect::to("/").into_response())
}
