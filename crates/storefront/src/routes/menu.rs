//! Public menu route handlers.
//!
//! The menu snapshot is built once on `/menu?r=...` and kept in the
//! visitor's session; the other handlers only change what is shown.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use qr_menu_core::{CategoryId, ProductId};
use qr_menu_data::Generations;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session_keys;
use crate::state::AppState;
use crate::view_model::{CustomerViewModel, INVALID_LINK, MenuPhase, MenuView};

/// Menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu.html")]
pub struct MenuTemplate {
    pub view: MenuView,
}

/// Shown in place of the menu when the link has no restaurant id.
#[derive(Template, WebTemplate)]
#[template(path = "invalid_link.html")]
pub struct InvalidLinkTemplate {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub r: Option<String>,
}

/// Per-visitor key for load generations, created on first use.
async fn page_key(session: &Session) -> Result<String> {
    if let Some(key) = session.get::<String>(session_keys::PAGE_KEY).await? {
        return Ok(key);
    }
    let key = uuid::Uuid::new_v4().to_string();
    session.insert(session_keys::PAGE_KEY, &key).await?;
    Ok(key)
}

async fn store(session: &Session, vm: &CustomerViewModel) -> Result<()> {
    session.insert(session_keys::MENU, vm).await?;
    Ok(())
}

/// Store `vm` only if `generation` is still the newest load for `key`.
async fn store_if_current(
    generations: &Generations,
    session: &Session,
    key: &str,
    generation: u64,
    vm: &CustomerViewModel,
) -> Result<bool> {
    if !generations.is_current(key, generation).await {
        tracing::debug!(generation, "discarding stale menu load");
        return Ok(false);
    }
    store(session, vm).await?;
    Ok(true)
}

async fn stored(session: &Session) -> Result<CustomerViewModel> {
    Ok(session
        .get(session_keys::MENU)
        .await?
        .unwrap_or_else(CustomerViewModel::invalid_link))
}

fn render(vm: &CustomerViewModel) -> Response {
    if vm.phase == MenuPhase::InvalidLink {
        return (
            StatusCode::BAD_REQUEST,
            InvalidLinkTemplate {
                message: INVALID_LINK,
            },
        )
            .into_response();
    }
    MenuTemplate { view: vm.view() }.into_response()
}

/// Apply `action` to the stored menu, store it and render it.
async fn with_menu(session: &Session, action: impl FnOnce(&mut CustomerViewModel)) -> Result<Response> {
    let mut vm = stored(session).await?;
    action(&mut vm);
    store(session, &vm).await?;
    Ok(render(&vm))
}

/// Enter a restaurant's menu.
///
/// The snapshot is stored only if no newer entry by the same visitor
/// started while it was loading.
///
/// GET /menu?r={id}
#[instrument(skip(state, session))]
pub async fn enter(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MenuQuery>,
) -> Result<Response> {
    let key = page_key(&session).await?;
    let generation = state.generations().begin(&key).await;

    let vm = CustomerViewModel::enter(state.services(), query.r.as_deref()).await;

    store_if_current(state.generations(), &session, &key, generation, &vm).await?;
    Ok(render(&vm))
}

/// GET /menu/current
pub async fn current(session: Session) -> Result<Response> {
    Ok(render(&stored(&session).await?))
}

/// GET /menu/category/{id}
#[instrument(skip(session))]
pub async fn select_category(session: Session, Path(id): Path<CategoryId>) -> Result<Response> {
    add_breadcrumb("menu", "Selected category", Some(&[("category_id", id.as_str())]));
    with_menu(&session, |vm| {
        vm.select_category(&id);
    })
    .await
}

/// GET /menu/product/{id}
#[instrument(skip(session))]
pub async fn open_product(session: Session, Path(id): Path<ProductId>) -> Result<Response> {
    let mut vm = stored(&session).await?;
    if !vm.open_product(&id) {
        return Err(AppError::NotFound(format!("product {id}")));
    }
    store(&session, &vm).await?;
    Ok(render(&vm))
}

/// GET /menu/product/close
pub async fn close_product(session: Session) -> Result<Response> {
    with_menu(&session, CustomerViewModel::close_product).await
}

/// POST /menu/lang
pub async fn toggle_language(session: Session) -> Result<impl IntoResponse> {
    let mut vm = stored(&session).await?;
    vm.toggle_language();
    store(&session, &vm).await?;
    Ok(Redirect::to("/menu/current"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn ready() -> CustomerViewModel {
        CustomerViewModel {
            phase: MenuPhase::Ready,
            selected_category: Some(CategoryId::new("c2")),
            ..CustomerViewModel::default()
        }
    }

    #[tokio::test]
    async fn test_stale_load_is_not_stored() {
        let generations = Generations::default();
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let key = page_key(&session).await.unwrap();

        let older = generations.begin(&key).await;
        let newer = generations.begin(&key).await;

        let stale = CustomerViewModel::invalid_link();
        assert!(!store_if_current(&generations, &session, &key, older, &stale).await.unwrap());
        assert!(session
            .get::<CustomerViewModel>(session_keys::MENU)
            .await
            .unwrap()
            .is_none());

        assert!(store_if_current(&generations, &session, &key, newer, &ready()).await.unwrap());
        assert!(!store_if_current(&generations, &session, &key, older, &stale).await.unwrap());

        let kept = stored(&session).await.unwrap();
        assert_eq!(kept.phase, MenuPhase::Ready);
        assert_eq!(kept.selected_category, Some(CategoryId::new("c2")));
    }

    #[tokio::test]
    async fn test_page_key_is_stable_per_session() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let first = page_key(&session).await.unwrap();
        assert_eq!(page_key(&session).await.unwrap(), first);
    }
}
