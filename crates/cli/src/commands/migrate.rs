//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! cookshop-cli migrate
//! ```
//!
//! Runs every migration in `crates/core/migrations/`: the `site_settings`
//! table and the `tower_sessions` session table shared by both binaries.
//! The servers never migrate on startup.

use sqlx::PgPool;

use super::CliError;

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn run(pool: &PgPool) -> Result<(), CliError> {
    tracing::info!("Running migrations...");
    sqlx::migrate!("../core/migrations").run(pool).await?;
    tracing::info!("Migrations complete!");
    Ok(())
}
