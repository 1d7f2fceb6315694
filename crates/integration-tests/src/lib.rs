//! Integration tests for Cookshop.
//!
//! Each test starts the storefront or admin router in-process on an
//! ephemeral port, backed by [`MemorySettingsStore`] and an in-memory session
//! store, and drives it with `reqwest`. One [`browser`] is one cookie jar, so
//! two browsers model two independent admin sessions.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cookshop-integration-tests
//! ```
//!
//! No database or external service is needed.

use std::net::SocketAddr;
use std::sync::Arc;

use cookshop_core::{Currency, MemorySettingsStore};
use reqwest::{Client, redirect};
use secrecy::SecretString;
use tower_sessions::MemoryStore;
use url::Url;

/// A server running on a background task for the lifetime of the test.
pub struct TestServer {
    pub base_url: String,
    pub settings: Arc<MemorySettingsStore>,
}

impl TestServer {
    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Test server failed");
    });

    format!("http://{addr}")
}

/// Start the storefront over the given settings.
pub async fn spawn_storefront(settings: Arc<MemorySettingsStore>) -> TestServer {
    let config = cookshop_storefront::config::StorefrontConfig {
        database_url: SecretString::from("postgres://unused/cookshop_test"),
        host: "127.0.0.1".parse().expect("valid address"),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        currency: Currency::Gyd,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };
    let state = cookshop_storefront::state::AppState::new(config, settings.clone());
    let base_url = serve(cookshop_storefront::app(state, MemoryStore::default())).await;

    TestServer { base_url, settings }
}

/// Start the admin panel over the given settings.
pub async fn spawn_admin(settings: Arc<MemorySettingsStore>) -> TestServer {
    let config = cookshop_admin::config::AdminConfig {
        database_url: SecretString::from("postgres://unused/cookshop_test"),
        host: "127.0.0.1".parse().expect("valid address"),
        port: 0,
        base_url: Url::parse("http://127.0.0.1").expect("valid URL"),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };
    let state = cookshop_admin::state::AppState::new(config, settings.clone());
    let base_url = serve(cookshop_admin::app(state, MemoryStore::default())).await;

    TestServer { base_url, settings }
}

/// A fresh cookie jar that does not follow redirects.
#[must_use]
pub fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// The `Location` header of a redirect response.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
