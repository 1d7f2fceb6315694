//! Session-related types for admin authentication.

use serde::{Deserialize, Serialize};

/// Persisted admin authentication state.
///
/// Survives reloads but is never trusted on its own: the gate re-checks it
/// against the stored credential on every evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub is_authenticated: bool,
    /// Unix timestamp (seconds) of the last successful login.
    pub login_timestamp: Option<i64>,
    /// Version of the credential row this session logged in against.
    /// `None` when it logged in with the bootstrap password.
    pub credential_epoch: Option<i64>,
}

impl AuthSession {
    /// A freshly authenticated session.
    #[must_use]
    pub const fn authenticated(login_timestamp: i64, credential_epoch: Option<i64>) -> Self {
        Self {
            is_authenticated: true,
            login_timestamp: Some(login_timestamp),
            credential_epoch,
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for the persisted [`AuthSession`](super::AuthSession).
    pub const ADMIN_AUTH: &str = "admin_auth";
}
