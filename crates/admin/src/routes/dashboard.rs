//! Dashboard page, product filter, modal close and confirmation.

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, set_sentry_user};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;
use crate::view_model::DashboardView;

use super::{current_dashboard, enter_dashboard, render_dashboard, store_dashboard, with_dashboard};

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub view: DashboardView,
}

/// Shown instead of the dashboard when it cannot be built.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub message: String,
    pub email: String,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/products", get(filter_products))
        .route("/modal/close", post(close_modal))
        .route("/confirm", post(confirm))
}

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub reload: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    pub category: Option<String>,
    #[serde(default)]
    pub q: String,
}

/// Render the dashboard, entering it on first visit or on `?reload=1`.
///
/// GET /
#[instrument(skip(state, session, admin), fields(email = %admin.email))]
async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(query): Query<IndexQuery>,
) -> Result<Response, AppError> {
    set_sentry_user(&admin.user_id, admin.email.as_str());

    let vm = if query.reload.is_some() {
        enter_dashboard(&state, &session, &admin).await?
    } else {
        current_dashboard(&state, &session, &admin).await?
    };
    render_dashboard(&state, &session, vm).await
}

/// Apply the category filter and search text to the product list.
///
/// GET /products?category=&q=
#[instrument(skip(state, session, admin))]
async fn filter_products(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(query): Query<FilterQuery>,
) -> Result<Response, AppError> {
    with_dashboard(&state, &session, &admin, |vm| {
        vm.set_filter(query.category.as_deref(), &query.q);
    })
    .await
}

/// POST /modal/close
async fn close_modal(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Response, AppError> {
    let mut vm = current_dashboard(&state, &session, &admin).await?;
    vm.close_modal();
    store_dashboard(&session, &vm).await?;
    Ok(Redirect::to("/").into_response())
}

/// Run the action waiting in the confirm modal.
///
/// POST /confirm
#[instrument(skip(state, session, admin))]
async fn confirm(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Response, AppError> {
    let mut vm = current_dashboard(&state, &session, &admin).await?;
    if !vm.begin_submit() {
        return Ok(Redirect::to("/").into_response());
    }
    store_dashboard(&session, &vm).await?;

    vm.confirm(&state.services_for(&admin.access_token)).await;
    store_dashboard(&session, &vm).await?;
    Ok(Redirect::to("/").into_response())
}
