//! Supabase implementation of [`Gateway`].
//!
//! - Tables: PostgREST at `{url}/rest/v1/{table}`
//! - Auth: GoTrue at `{url}/auth/v1/...`
//! - Files: storage at `{url}/storage/v1/object/...`
//!
//! Every request carries the project's anon key in `apikey`; the bearer token
//! is the signed-in user's access token when there is one, otherwise the anon
//! key. Row-level security in the data store decides what each token may do.
//! There is no retry: a failed call surfaces to the caller once.

use std::sync::Arc;
use std::time::Duration;

use qr_menu_core::{Email, ImageUpload};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use super::{AccessToken, AuthSession, AuthUser, Filter, Gateway, GatewayError, SelectQuery, Table};
use super::query::filter_params;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Connection settings for a Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: Url,
    /// Public anon key.
    pub anon_key: SecretString,
}

/// Gateway backed by a Supabase project.
#[derive(Clone)]
pub struct SupabaseGateway {
    inner: Arc<SupabaseInner>,
    access_token: Option<AccessToken>,
}

struct SupabaseInner {
    client: reqwest::Client,
    base: String,
    anon_key: SecretString,
}

impl std::fmt::Debug for SupabaseGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseGateway")
            .field("base", &self.inner.base)
            .field("authenticated", &self.access_token.is_some())
            .finish_non_exhaustive()
    }
}

impl SupabaseGateway {
    /// Create an anonymous gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &SupabaseConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(SupabaseInner {
                client,
                base: config.url.as_str().trim_end_matches('/').to_string(),
                anon_key: config.anon_key.clone(),
            }),
            access_token: None,
        })
    }

    fn rest_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{table}", self.inner.base)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.inner.base)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let anon_key = self.inner.anon_key.expose_secret();
        let bearer = self
            .access_token
            .as_ref()
            .map_or(anon_key, AccessToken::expose);

        self.inner
            .client
            .request(method, url)
            .header("apikey", anon_key)
            .bearer_auth(bearer)
    }
}

/// Read the body of a response, turning non-success statuses into errors.
async fn read_body(response: Response) -> Result<String, GatewayError> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(body);
    }

    Err(status_error(status, &body))
}

/// Classify a non-success response. Only logged at debug level; the
/// failure itself is reported once by `api::fetch`.
fn status_error(status: StatusCode, body: &str) -> GatewayError {
    debug!(
        status = %status,
        body = %body.chars().take(500).collect::<String>(),
        "Supabase returned non-success status"
    );

    let message = error_message(body);
    if status == StatusCode::UNAUTHORIZED {
        return GatewayError::Unauthorized(message);
    }
    GatewayError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Pull a human-readable message out of a PostgREST/GoTrue/storage error body.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        msg: Option<String>,
        error_description: Option<String>,
        error: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|e| e.message.or(e.msg).or(e.error_description).or(e.error))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[derive(Deserialize)]
struct UserResponse {
    id: String,
    email: Email,
}

impl From<UserResponse> for AuthUser {
    fn from(user: UserResponse) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: UserResponse,
}

impl Gateway for SupabaseGateway {
    #[instrument(skip(self), fields(table = %query.table))]
    async fn select(&self, query: SelectQuery) -> Result<Vec<serde_json::Value>, GatewayError> {
        let response = self
            .request(Method::GET, &self.rest_url(query.table))
            .query(&query.to_params())
            .send()
            .await?;

        let body = read_body(response).await?;
        let rows: Vec<serde_json::Value> = serde_json::from_str(&body)?;
        debug!(rows = rows.len(), "select");
        Ok(rows)
    }

    #[instrument(skip(self), fields(table = %query.table))]
    async fn select_single(&self, query: SelectQuery) -> Result<serde_json::Value, GatewayError> {
        let response = self
            .request(Method::GET, &self.rest_url(query.table))
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT)
            .query(&query.to_params())
            .send()
            .await?;

        // PostgREST answers 406 when the object form matches zero rows
        if response.status() == StatusCode::NOT_ACCEPTABLE {
            return Err(GatewayError::NotFound);
        }

        let body = read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    #[instrument(skip(self, row))]
    async fn insert(&self, table: Table, row: serde_json::Value) -> Result<(), GatewayError> {
        let response = self
            .request(Method::POST, &self.rest_url(table))
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await?;

        read_body(response).await?;
        Ok(())
    }

    #[instrument(skip(self, changes))]
    async fn update(
        &self,
        table: Table,
        filters: Vec<Filter>,
        changes: serde_json::Value,
    ) -> Result<(), GatewayError> {
        let response = self
            .request(Method::PATCH, &self.rest_url(table))
            .header("Prefer", "return=minimal")
            .query(&filter_params(&filters))
            .json(&changes)
            .send()
            .await?;

        read_body(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, table: Table, filters: Vec<Filter>) -> Result<(), GatewayError> {
        let response = self
            .request(Method::DELETE, &self.rest_url(table))
            .header("Prefer", "return=minimal")
            .query(&filter_params(&filters))
            .send()
            .await?;

        read_body(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn current_user(&self) -> Result<Option<AuthUser>, GatewayError> {
        if self.access_token.is_none() {
            return Ok(None);
        }

        let response = self
            .request(Method::GET, &self.auth_url("user"))
            .send()
            .await?;

        // Expired or revoked tokens mean "not signed in", not a failure
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            debug!("access token rejected");
            return Ok(None);
        }

        let body = read_body(response).await?;
        let user: UserResponse = serde_json::from_str(&body)?;
        Ok(Some(user.into()))
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthSession, GatewayError> {
        let response = self
            .request(Method::POST, &self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({
                "email": email.as_str(),
                "password": password.expose_secret(),
            }))
            .send()
            .await?;

        // GoTrue reports bad credentials as 400 invalid_grant
        if response.status() == StatusCode::BAD_REQUEST {
            let body = response.text().await?;
            return Err(GatewayError::Unauthorized(error_message(&body)));
        }

        let body = read_body(response).await?;
        let token: TokenResponse = serde_json::from_str(&body)?;
        Ok(AuthSession {
            access_token: AccessToken::new(token.access_token),
            user: token.user.into(),
        })
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), GatewayError> {
        if self.access_token.is_none() {
            return Ok(());
        }

        let response = self
            .request(Method::POST, &self.auth_url("logout"))
            .send()
            .await?;

        read_body(response).await?;
        Ok(())
    }

    #[instrument(skip(self, file), fields(size = file.bytes.len()))]
    async fn upload(&self, bucket: &str, key: &str, file: &ImageUpload) -> Result<(), GatewayError> {
        let url = format!("{}/storage/v1/object/{bucket}/{key}", self.inner.base);
        let response = self
            .request(Method::POST, &url)
            .header(reqwest::header::CONTENT_TYPE, file.mime())
            .header("cache-control", "3600")
            .body(file.bytes.clone())
            .send()
            .await?;

        match read_body(response).await {
            Ok(_) => Ok(()),
            Err(GatewayError::Status { message, .. } | GatewayError::Unauthorized(message)) => {
                Err(GatewayError::Storage(message))
            }
            Err(e) => Err(e),
        }
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/storage/v1/object/public/{bucket}/{key}", self.inner.base)
    }

    fn with_access_token(&self, token: &AccessToken) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            access_token: Some(token.clone()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gateway() -> SupabaseGateway {
        SupabaseGateway::new(&SupabaseConfig {
            url: Url::parse("https://demo.supabase.co/").unwrap(),
            anon_key: SecretString::from("anon-key"),
        })
        .unwrap()
    }

    #[test]
    fn test_urls() {
        let gateway = gateway();
        assert_eq!(
            gateway.rest_url(Table::RestaurantAdmins),
            "https://demo.supabase.co/rest/v1/restaurant_admins"
        );
        assert_eq!(
            gateway.public_url("restaurant-images", "r1/logo_1.png"),
            "https://demo.supabase.co/storage/v1/object/public/restaurant-images/r1/logo_1.png"
        );
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"code":"23505","message":"duplicate key"}"#),
            "duplicate key"
        );
        assert_eq!(
            error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_status_error_logs_only_at_debug() {
        use std::sync::{Arc, Mutex};

        use tracing::{Event, Level, Subscriber};
        use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

        struct Levels(Arc<Mutex<Vec<Level>>>);

        impl<S: Subscriber> Layer<S> for Levels {
            fn on_event(&self, event: &Event<'_>, _: Context<'_, S>) {
                self.0.lock().unwrap().push(*event.metadata().level());
            }
        }

        let levels = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(Levels(Arc::clone(&levels)));
        let (denied, expired) = tracing::subscriber::with_default(subscriber, || {
            (
                status_error(StatusCode::FORBIDDEN, r#"{"message":"permission denied for table products"}"#),
                status_error(StatusCode::UNAUTHORIZED, r#"{"msg":"JWT expired"}"#),
            )
        });

        assert!(matches!(
            denied,
            GatewayError::Status { status: 403, ref message } if message == "permission denied for table products"
        ));
        assert!(matches!(expired, GatewayError::Unauthorized(_)));
        assert_eq!(*levels.lock().unwrap(), [Level::DEBUG, Level::DEBUG]);
    }

    #[test]
    fn test_debug_hides_token() {
        let gateway = gateway().with_access_token(&AccessToken::new("secret-token"));
        let debug = format!("{gateway:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("authenticated: true"));
    }
}
