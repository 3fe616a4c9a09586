//! QR menu storefront library.
//!
//! Serves the public bilingual menu a customer reaches by scanning a
//! restaurant's QR code (`/menu?r={restaurant_id}`).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod view_model;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Build the storefront application.
///
/// `rate_limit` adds the per-IP limiter to menu routes; tests that drive
/// the router without client addresses leave it off.
pub fn app(state: AppState, rate_limit: bool) -> Router {
    let mut menu = routes::routes();
    if rate_limit {
        menu = menu.layer(middleware::menu_rate_limiter(state.config().menu_rate_burst));
    }

    Router::new()
        .route("/health", get(health))
        .merge(menu)
        .nest_service("/static", ServeDir::new("crates/storefront/static"))
        .layer(middleware::create_session_layer(state.config()))
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use qr_menu_data::gateway::SupabaseConfig;
    use secrecy::SecretString;
    use tower::ServiceExt;

    use config::{DEFAULT_MENU_RATE_BURST, StorefrontConfig};

    fn state() -> AppState {
        AppState::new(StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            supabase: SupabaseConfig {
                url: url::Url::parse("https://abc.supabase.co").unwrap(),
                anon_key: SecretString::from("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.anon"),
            },
            placeholder_image: qr_menu_core::DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            menu_rate_burst: DEFAULT_MENU_RATE_BURST,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        })
        .unwrap()
    }

    async fn get(uri: &str) -> axum::response::Response {
        app(state(), false)
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_menu_without_id_is_invalid_link() {
        assert_eq!(get("/menu").await.status(), StatusCode::BAD_REQUEST);
        assert_eq!(get("/").await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_current_without_session_is_invalid_link() {
        assert_eq!(get("/menu/current").await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_product_without_menu_is_not_found() {
        assert_eq!(get("/menu/product/p1").await.status(), StatusCode::NOT_FOUND);
    }
}
