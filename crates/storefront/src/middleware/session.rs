//! Session middleware configuration.
//!
//! Sets up sessions using tower-sessions. Production uses the `PostgreSQL`
//! store; tests plug in `tower_sessions::MemoryStore`.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "cookshop_session";

/// Session expiry time in seconds (30 days).
///
/// The cart is meant to survive closing the browser, so the window is long.
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Keys used in the storefront session.
pub mod session_keys {
    /// Serialized cart snapshot.
    pub const CART: &str = "cart";
}

/// Create the session layer over any session store.
///
/// `secure` should be true when the site is served over HTTPS.
#[must_use]
pub fn create_session_layer<S: SessionStore + Clone>(
    store: S,
    secure: bool,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
