//! Cookshop Admin library.
//!
//! This crate provides the admin functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Security
//!
//! This crate reads and writes the admin credential in `site_settings`.
//! Every page except the login form goes through the admin gate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tower_sessions::SessionStore;

use crate::state::AppState;

/// Build the admin router over the given session store.
///
/// Login submissions are rate limited per client IP, so callers must either
/// run behind the Fly.io proxy or serve with `ConnectInfo`.
/// Sentry layers and static files are added by the binary.
pub fn app<S: SessionStore + Clone>(state: AppState, session_store: S) -> Router {
    let session_layer = middleware::create_session_layer(session_store, state.config().is_secure());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use cookshop_core::MemorySettingsStore;
    use secrecy::SecretString;
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;
    use url::Url;

    use super::*;
    use crate::config::AdminConfig;

    const CLIENT_IP: &str = "203.0.113.10";

    fn test_config() -> AdminConfig {
        AdminConfig {
            database_url: SecretString::from("postgres://localhost/cookshop_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: Url::parse("http://localhost:3001").unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    fn test_app(settings: Arc<MemorySettingsStore>) -> Router {
        app(AppState::new(test_config(), settings), MemoryStore::default())
    }

    fn with_password(password: &str) -> Arc<MemorySettingsStore> {
        Arc::new(MemorySettingsStore::with_values([("admin_password", password)]))
    }

    fn session_cookie(response: &Response) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_owned)
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri).header("fly-client-ip", CLIENT_IP);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("fly-client-ip", CLIENT_IP);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_owned())).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Log in and return the session cookie.
    async fn login(app: &Router, password: &str) -> String {
        let response = app
            .clone()
            .oneshot(post_form("/auth/login", &format!("password={password}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        session_cookie(&response).unwrap()
    }

    #[tokio::test]
    async fn test_health_and_security_headers() {
        let app = test_app(Arc::new(MemorySettingsStore::new()));
        let response = app.oneshot(get("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
    }

    #[tokio::test]
    async fn test_readiness_reflects_store() {
        let store = Arc::new(MemorySettingsStore::new());
        let app = test_app(store.clone());

        let response = app.clone().oneshot(get("/health/ready", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        store.set_unavailable(true);
        let response = app.oneshot(get("/health/ready", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_protected_page_redirects_to_login() {
        let app = test_app(with_password("pepperpot-7"));
        let response = app.clone().oneshot(get("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/auth/login");

        let response = app.oneshot(get("/auth/login", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Admin login"));
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let app = test_app(with_password("pepperpot-7"));
        let response = app
            .oneshot(post_form("/auth/login", "password=garlic-pork", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response).await.contains("Invalid password"));
    }

    #[tokio::test]
    async fn test_login_opens_dashboard() {
        let store = Arc::new(MemorySettingsStore::with_values([
            ("admin_password", "pepperpot-7"),
            ("business_name", "Auntie's Kitchen"),
        ]));
        let app = test_app(store);
        let cookie = login(&app, "pepperpot-7").await;

        let response = app.clone().oneshot(get("/", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        assert!(page.contains("Auntie&#39;s Kitchen") || page.contains("Auntie's Kitchen"));
        assert!(!page.contains("No admin password is set"));

        // An authenticated browser skips the login form.
        let response = app.oneshot(get("/auth/login", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_status_reports_gate_state() {
        let app = test_app(with_password("pepperpot-7"));

        let response = app.clone().oneshot(get("/auth/status", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let status: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(status["state"], "requires_login");
        assert_eq!(status["view"], "login_prompt");
        assert_eq!(status["has_password"], true);
        assert_eq!(status["is_authenticated"], false);

        let cookie = login(&app, "pepperpot-7").await;
        let response = app.oneshot(get("/auth/status", Some(&cookie))).await.unwrap();
        let status: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(status["state"], "authenticated");
        assert_eq!(status["view"], "protected");
        assert!(status["login_timestamp"].is_i64());
    }

    #[tokio::test]
    async fn test_first_run_gate_is_open() {
        let app = test_app(Arc::new(MemorySettingsStore::new()));

        let response = app.clone().oneshot(get("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("No admin password is set"));

        let response = app.oneshot(get("/auth/status", None)).await.unwrap();
        let status: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(status["state"], "authenticated");
        assert_eq!(status["has_password"], false);
        assert_eq!(status["is_authenticated"], false);
    }

    #[tokio::test]
    async fn test_logout_returns_to_login() {
        let app = test_app(with_password("pepperpot-7"));
        let cookie = login(&app, "pepperpot-7").await;

        let response = app
            .clone()
            .oneshot(post_form("/auth/logout", "", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/auth/login?notice=logged-out");

        let response = app.oneshot(get("/", Some(&cookie))).await.unwrap();
        assert_eq!(location(&response), "/auth/login");
    }

    #[tokio::test]
    async fn test_password_change_logs_out_every_browser() {
        let store = with_password("pepperpot-7");
        let app = test_app(store.clone());

        let first = login(&app, "pepperpot-7").await;
        let second = login(&app, "pepperpot-7").await;

        let response = app
            .clone()
            .oneshot(post_form(
                "/settings/password",
                "current_password=pepperpot-7&new_password=cassava-bread-9&confirm_password=cassava-bread-9",
                Some(&first),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/auth/login?notice=password-changed");

        for cookie in [&first, &second] {
            let response = app.clone().oneshot(get("/", Some(cookie))).await.unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&response), "/auth/login");
        }

        let response = app
            .clone()
            .oneshot(post_form("/auth/login", "password=pepperpot-7", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let cookie = login(&app, "cassava-bread-9").await;
        let response = app.oneshot(get("/", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_password_change_rejections() {
        let app = test_app(with_password("pepperpot-7"));
        let cookie = login(&app, "pepperpot-7").await;

        let cases = [
            "current_password=pepperpot-7&new_password=cassava-bread-9&confirm_password=other-9",
            "current_password=pepperpot-7&new_password=short1&confirm_password=short1",
            "current_password=wrong-one-1&new_password=cassava-bread-9&confirm_password=cassava-bread-9",
        ];
        for body in cases {
            let response = app
                .clone()
                .oneshot(post_form("/settings/password", body, Some(&cookie)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }

        // Still logged in with the old password.
        let response = app.oneshot(get("/", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_first_password_uses_bootstrap_credential() {
        let store = Arc::new(MemorySettingsStore::new());
        let app = test_app(store.clone());

        let response = app
            .clone()
            .oneshot(post_form(
                "/settings/password",
                "current_password=admin123&new_password=cassava-bread-9&confirm_password=cassava-bread-9",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        // The gate is no longer open.
        let response = app.oneshot(get("/", None)).await.unwrap();
        assert_eq!(location(&response), "/auth/login");
    }

    #[tokio::test]
    async fn test_login_is_rate_limited() {
        let app = test_app(with_password("pepperpot-7"));

        for _ in 0..5 {
            let response = app
                .clone()
                .oneshot(post_form("/auth/login", "password=guess-1", None))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let response = app
            .clone()
            .oneshot(post_form("/auth/login", "password=pepperpot-7", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        // Other pages are not limited.
        let response = app.oneshot(get("/auth/status", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rate_limit_ignores_spoofed_forwarding_headers() {
        let app = test_app(with_password("pepperpot-7"));

        for n in 0..6 {
            let request = Request::post("/auth/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header("fly-client-ip", CLIENT_IP)
                .header("x-forwarded-for", format!("198.51.100.{n}"))
                .header("x-real-ip", format!("198.51.100.{n}"))
                .body(Body::from("password=guess-1"))
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            let expected = if n < 5 {
                StatusCode::UNAUTHORIZED
            } else {
                StatusCode::TOO_MANY_REQUESTS
            };
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn test_login_page_is_not_rate_limited() {
        let app = test_app(with_password("pepperpot-7"));

        for _ in 0..10 {
            let response = app.clone().oneshot(get("/auth/login", None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        // Viewing the form does not spend login attempts.
        let response = app
            .oneshot(post_form("/auth/login", "password=pepperpot-7", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
}
