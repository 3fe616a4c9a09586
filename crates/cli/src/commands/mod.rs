//! CLI command implementations.
//!
//! Commands are generic over the gateway so they can be exercised against
//! the in-memory store; the binary always connects with the service key.

pub mod admins;
pub mod menu_url;
pub mod seed;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use qr_menu_core::{DraftError, EmailError};
use qr_menu_data::gateway::{AccessToken, SupabaseConfig, SupabaseGateway};
use qr_menu_data::{ApiError, GatewayError, ServiceSettings, Services};

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0} not set")]
    MissingEnv(&'static str),

    #[error("invalid {name}: {reason}")]
    InvalidEnv { name: &'static str, reason: String },

    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("{}: {}", .0.message, .0.detail)]
    Api(#[from] ApiError),

    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("{0}")]
    Invalid(String),

    #[error("invalid seed file: {0}")]
    Seed(String),

    #[error("invalid seed entry {entry}: {source}")]
    Draft { entry: String, source: DraftError },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn required(name: &'static str) -> Result<String, CliError> {
    std::env::var(name).map_err(|_| CliError::MissingEnv(name))
}

/// Services acting with the project's service key.
///
/// # Errors
///
/// Returns an error if `SUPABASE_URL` or `SUPABASE_SERVICE_KEY` is missing
/// or the HTTP client cannot be built.
pub fn connect() -> Result<Services<SupabaseGateway>, CliError> {
    dotenvy::dotenv().ok();

    let url = required("SUPABASE_URL")?;
    let url = Url::parse(&url).map_err(|e| CliError::InvalidEnv {
        name: "SUPABASE_URL",
        reason: e.to_string(),
    })?;
    let key = SecretString::from(required("SUPABASE_SERVICE_KEY")?);
    let token = AccessToken::new(key.expose_secret());

    let gateway = SupabaseGateway::new(&SupabaseConfig { url, anon_key: key })?;
    tracing::debug!("Connected with service key");
    Ok(Services::new(gateway, ServiceSettings::default()).with_access_token(&token))
}
