//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness (settings store reachable)
//!
//! # Dashboard
//! GET  /                       - Dashboard overview (protected)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Submit password (rate limited)
//! POST /auth/logout            - Logout
//! GET  /auth/status            - Gate state as JSON
//!
//! # Settings
//! GET  /settings/password      - Change password form (protected)
//! POST /settings/password      - Rotate the admin password (protected)
//! ```

pub mod auth;
pub mod dashboard;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(settings::router())
}
