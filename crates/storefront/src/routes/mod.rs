//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Menu
//! GET  /                       - Same as /menu (no id: invalid link page)
//! GET  /menu?r={id}            - Enter a restaurant's menu
//! GET  /menu/current           - Re-render the visitor's menu
//! GET  /menu/category/{id}     - Highlight a category
//! GET  /menu/product/{id}      - Open the product overlay
//! GET  /menu/product/close     - Close the product overlay
//! POST /menu/lang              - Toggle Arabic/English
//! ```

pub mod menu;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the menu routes router.
pub fn menu_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(menu::enter))
        .route("/current", get(menu::current))
        .route("/category/{id}", get(menu::select_category))
        .route("/product/close", get(menu::close_product))
        .route("/product/{id}", get(menu::open_product))
        .route("/lang", post(menu::toggle_language))
}

/// Build the full storefront router (without rate limiting).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(menu::enter))
        .nest("/menu", menu_routes())
}
