//! REST API layer built on Axum.
//!
//! Routes `/predict` (country suggestions) and `/classify` (comment
//! classification), each accepting `POST` with a JSON body and `OPTIONS`
//! pre-flight, plus a `/health` probe.

/// API error types mapped to HTTP status codes.
pub mod errors;
/// HTTP request handlers and application state.
pub mod handlers;
/// Request and response data transfer objects.
pub mod models;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use handlers::AppState;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config;

/// Builds the application router.
///
/// `OPTIONS` is answered by [`handlers::preflight`] directly; every other
/// response gets `Access-Control-Allow-Origin: *` added on the way out.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/predict",
            post(handlers::suggest).options(handlers::preflight),
        )
        .route(
            "/classify",
            post(handlers::classify).options(handlers::preflight),
        )
        .route("/health", get(handlers::health))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(DefaultBodyLimit::max(config::MAX_REQUEST_BODY_BYTES))
        .with_state(state)
}
