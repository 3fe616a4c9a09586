//! Session keys for the menu.
//!
//! The visitor's menu snapshot lives in the session so that category
//! switches and the language toggle never refetch.

/// Session keys for menu state.
pub mod keys {
    /// Key for the [`crate::view_model::CustomerViewModel`] snapshot.
    pub const MENU: &str = "menu";

    /// Key for the visitor's load-generation key.
    pub const PAGE_KEY: &str = "page_key";
}
