//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use qr_menu_core::Email;
use qr_menu_data::gateway::{AccessToken, AuthSession};

/// Session-stored admin identity.
///
/// Minimal data stored in the session to act on the data store as the
/// signed-in admin. The restaurant and role are resolved on dashboard entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Auth-service user id.
    pub user_id: String,
    /// Admin's email address.
    pub email: Email,
    /// Bearer token for data store calls.
    pub access_token: AccessToken,
}

impl From<AuthSession> for CurrentAdmin {
    fn from(session: AuthSession) -> Self {
        Self {
            user_id: session.user.id,
            email: session.user.email,
            access_token: session.access_token,
        }
    }
}

/// Session keys for admin state.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the dashboard snapshot.
    pub const DASHBOARD: &str = "dashboard";

    /// Key for the visitor's page key used by load generations.
    pub const PAGE_KEY: &str = "page_key";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use qr_menu_data::gateway::AuthUser;

    #[test]
    fn test_current_admin_from_auth_session() {
        let email = Email::parse("owner@cafe.sa").unwrap();
        let admin = CurrentAdmin::from(AuthSession {
            access_token: AccessToken::new("token-1"),
            user: AuthUser {
                id: "user-1".to_string(),
                email: email.clone(),
            },
        });
        assert_eq!(admin.user_id, "user-1");
        assert_eq!(admin.email, email);
        assert_eq!(admin.access_token.expose(), "token-1");
        assert!(!format!("{admin:?}").contains("token-1"));
    }
}
