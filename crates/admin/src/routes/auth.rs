//! Authentication route handlers for admin.
//!
//! Email and password sign-in against the hosted auth service. The
//! returned access token is kept in the session and every dashboard
//! call acts as that user.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use qr_menu_core::Email;
use qr_menu_data::Gateway;
use qr_menu_data::api::{fetch, messages};

use crate::error::{AppError, clear_sentry_user};
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

/// Login page template.
#[derive(Template, Default)]
#[template(path = "login.html")]
struct LoginPageTemplate {
    error: Option<String>,
    email: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

fn render_login(template: &LoginPageTemplate) -> Response {
    Html(
        template
            .render()
            .unwrap_or_else(|_| String::from("Error rendering template")),
    )
    .into_response()
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page() -> Response {
    render_login(&LoginPageTemplate::default())
}

/// Sign in and start a fresh dashboard.
///
/// POST /auth/login
#[instrument(skip(state, session, form))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let Ok(email) = Email::parse(&form.email) else {
        return Ok(render_login(&LoginPageTemplate {
            error: Some(crate::view_model::INVALID_EMAIL.to_string()),
            email: form.email,
        }));
    };
    let password = SecretString::from(form.password);

    let signed_in = fetch(
        "sign_in",
        messages::SIGN_IN,
        state
            .services()
            .gateway()
            .sign_in_with_password(&email, &password),
    )
    .await;

    match signed_in {
        Ok(auth) => {
            session.cycle_id().await?;
            session.remove::<serde_json::Value>(session_keys::DASHBOARD).await?;
            set_current_admin(&session, &CurrentAdmin::from(auth)).await?;
            tracing::info!(email = %email, "admin signed in");
            Ok(Redirect::to("/?reload=1").into_response())
        }
        Err(e) => Ok(render_login(&LoginPageTemplate {
            error: Some(e.message),
            email: email.to_string(),
        })),
    }
}

/// Sign out and clear the session.
///
/// POST /auth/logout
async fn logout(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    if let Ok(Some(admin)) = session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
    {
        let _ = state.services_for(&admin.access_token).gateway().sign_out().await;
    }

    let _ = clear_current_admin(&session).await;
    clear_sentry_user();

    Redirect::to("/auth/login")
}
