//! Cookshop Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tower_sessions::SessionStore;

use crate::state::AppState;

/// Build the storefront router over the given session store.
///
/// Sentry layers and static files are added by the binary.
pub fn app<S: SessionStore + Clone>(state: AppState, session_store: S) -> Router {
    let session_layer = middleware::create_session_layer(session_store, state.config().is_secure());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<axum::body::Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the settings store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.settings_store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
