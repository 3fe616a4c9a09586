//! Hosted data gateway.
//!
//! The dashboard and the public menu never talk to HTTP directly; every read
//! and write goes through a [`Gateway`]. The production implementation is
//! [`SupabaseGateway`] (PostgREST + auth + object storage). Tests use
//! `MemoryGateway` (feature `memory`).
//!
//! Rows cross this boundary as untyped JSON; [`crate::rows`] turns them into
//! domain records exactly once.

#[cfg(any(test, feature = "memory"))]
pub mod memory;
mod query;
mod supabase;

use std::future::Future;

use qr_menu_core::{Email, ImageUpload};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(any(test, feature = "memory"))]
pub use memory::{MemoryGateway, Operation};
pub use query::{Filter, Order, SelectQuery, Table, filter_params};
pub use supabase::{SupabaseConfig, SupabaseGateway};

/// Errors returned by a [`Gateway`].
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Numeric status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A single-row read matched no row.
    #[error("record not found")]
    NotFound,

    /// Credentials were rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Object storage rejected an upload.
    #[error("storage error: {0}")]
    Storage(String),
}

/// A signed-in identity as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Auth-service user id.
    pub id: String,
    pub email: Email,
}

/// Bearer token for an authenticated session.
///
/// Stored in the server-side session so the dashboard can act on the data
/// store as the signed-in user. Never printed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Result of a successful password sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: AccessToken,
    pub user: AuthUser,
}

/// Access to the hosted data store, its auth service and its object storage.
///
/// Implementations are cheap to clone and share one connection pool.
pub trait Gateway: Clone + Send + Sync + 'static {
    /// Rows matching `query`, in the query's order.
    fn select(
        &self,
        query: SelectQuery,
    ) -> impl Future<Output = Result<Vec<serde_json::Value>, GatewayError>> + Send;

    /// Exactly one row matching `query`.
    ///
    /// Zero matching rows is [`GatewayError::NotFound`].
    fn select_single(
        &self,
        query: SelectQuery,
    ) -> impl Future<Output = Result<serde_json::Value, GatewayError>> + Send;

    /// Insert one row. The store assigns `id` and `created_at`.
    fn insert(
        &self,
        table: Table,
        row: serde_json::Value,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Apply `changes` to every row matching `filters`.
    fn update(
        &self,
        table: Table,
        filters: Vec<Filter>,
        changes: serde_json::Value,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Delete every row matching `filters`.
    fn delete(
        &self,
        table: Table,
        filters: Vec<Filter>,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// The user owning this gateway's access token, if the token is valid.
    fn current_user(
        &self,
    ) -> impl Future<Output = Result<Option<AuthUser>, GatewayError>> + Send;

    /// Exchange email and password for a session.
    fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<AuthSession, GatewayError>> + Send;

    /// Invalidate this gateway's access token.
    fn sign_out(&self) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Store `file` under `key` in `bucket`.
    fn upload(
        &self,
        bucket: &str,
        key: &str,
        file: &ImageUpload,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Public URL of an object. Pure; does not check the object exists.
    fn public_url(&self, bucket: &str, key: &str) -> String;

    /// A gateway acting as the holder of `token`.
    #[must_use]
    fn with_access_token(&self, token: &AccessToken) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_debug_redacted() {
        let token = AccessToken::new("eyJhbGciOi.secret");
        assert_eq!(format!("{token:?}"), "AccessToken([REDACTED])");
        assert_eq!(token.expose(), "eyJhbGciOi.secret");
    }
}
