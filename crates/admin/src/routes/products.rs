//! Product form (with image upload) and delete confirmation.

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::instrument;

use qr_menu_core::ProductId;

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;
use crate::view_model::ProductForm;

use super::{MAX_UPLOAD_BYTES, MultipartForm, current_dashboard, store_dashboard, with_dashboard};

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            post(save).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/products/new", get(new_form))
        .route("/products/{id}/edit", get(edit_form))
        .route("/products/{id}/delete", get(confirm_delete))
}

/// GET /products/new
async fn new_form(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Response, AppError> {
    with_dashboard(&state, &session, &admin, |vm| {
        vm.open_product_form(None);
    })
    .await
}

/// GET /products/{id}/edit
async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<ProductId>,
) -> Result<Response, AppError> {
    with_dashboard(&state, &session, &admin, |vm| {
        if !vm.open_product_form(Some(&id)) {
            tracing::debug!(%id, "edit requested for unknown product");
        }
    })
    .await
}

/// GET /products/{id}/delete
async fn confirm_delete(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<ProductId>,
) -> Result<Response, AppError> {
    with_dashboard(&state, &session, &admin, |vm| {
        vm.request_delete_product(&id);
    })
    .await
}

fn product_form(form: &MultipartForm) -> ProductForm {
    ProductForm {
        id: Some(form.text("id")).filter(|id| !id.trim().is_empty()),
        category_id: form.text("category_id"),
        name: form.text("name"),
        name_en: form.text("name_en"),
        description: form.text("description"),
        description_en: form.text("description_en"),
        price: form.text("price"),
        is_available: form.checkbox("is_available"),
        image_url: Some(form.text("image_url")).filter(|url| !url.is_empty()),
    }
}

/// Save the open product form, uploading the chosen image first.
///
/// POST /products (multipart)
#[instrument(skip(state, session, admin, multipart))]
async fn save(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let body = MultipartForm::read(multipart, "image").await?;

    let mut vm = current_dashboard(&state, &session, &admin).await?;
    if !vm.begin_submit() {
        return Ok(Redirect::to("/").into_response());
    }
    store_dashboard(&session, &vm).await?;

    vm.save_product(
        &state.services_for(&admin.access_token),
        product_form(&body),
        body.file,
    )
    .await;
    store_dashboard(&session, &vm).await?;
    Ok(Redirect::to("/").into_response())
}
