//! Authentication middleware and extractors for admin.
//!
//! Provides extractors for requiring admin authentication in route handlers.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};

/// Extractor that requires admin authentication.
///
/// If the admin is not logged in, returns a redirect to the login page.
/// Without a session layer in front it rejects with 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.email)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Error returned when admin authentication is required but the user is not logged in.
#[derive(Debug)]
pub enum AdminAuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// No session available.
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        let admin: CurrentAdmin = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or(AdminAuthRejection::RedirectToLogin)?;

        Ok(Self(admin))
    }
}

/// Helper to set the current admin in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Helper to clear the admin and their dashboard from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    session
        .remove::<serde_json::Value>(session_keys::DASHBOARD)
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::Request;
    use qr_menu_core::Email;
    use qr_menu_data::gateway::AccessToken;
    use tower_sessions::MemoryStore;

    use super::*;

    fn admin() -> CurrentAdmin {
        CurrentAdmin {
            user_id: "user-1".to_string(),
            email: Email::parse("owner@cafe.sa").unwrap(),
            access_token: AccessToken::new("token-1"),
        }
    }

    fn parts_with(session: Option<Session>) -> Parts {
        let (mut parts, ()) = Request::builder().uri("/").body(()).unwrap().into_parts();
        if let Some(session) = session {
            parts.extensions.insert(session);
        }
        parts
    }

    #[tokio::test]
    async fn test_rejects_without_session_layer() {
        let mut parts = parts_with(None);
        let result = RequireAdminAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AdminAuthRejection::Unauthorized)));
    }

    #[tokio::test]
    async fn test_redirects_then_accepts_signed_in_admin() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        let mut parts = parts_with(Some(session.clone()));
        let result = RequireAdminAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AdminAuthRejection::RedirectToLogin)));

        set_current_admin(&session, &admin()).await.unwrap();
        let mut parts = parts_with(Some(session.clone()));
        let RequireAdminAuth(found) = RequireAdminAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(found, admin());

        clear_current_admin(&session).await.unwrap();
        let mut parts = parts_with(Some(session));
        let result = RequireAdminAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AdminAuthRejection::RedirectToLogin)));
    }
}
