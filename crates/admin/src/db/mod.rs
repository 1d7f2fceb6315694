//! Database connection for the admin panel.
//!
//! The admin reads and writes `site_settings` (including the admin
//! credential) and stores sessions in `tower_sessions.session`. Migrations live
//! in `crates/core/migrations/` and are run via:
//! ```bash
//! cargo run -p cookshop-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a `PostgreSQL` connection pool.
///
/// Smaller than the storefront's: the admin panel has a handful of users.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
