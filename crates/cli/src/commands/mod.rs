//! Subcommand implementations.
//!
//! Commands that touch settings take a `&dyn SettingsStore` so they can be
//! exercised against the in-memory store. Only [`connect`] knows about
//! `PostgreSQL`.

pub mod migrate;
pub mod password;
pub mod settings;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

use cookshop_core::{PasswordPolicyError, StoreError};

/// Errors that can occur while running a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Key is not one the operator may set.
    #[error("Unknown setting: {0}. Valid keys: business_name, whatsapp_number, logo_url, theme")]
    UnknownSetting(String),

    /// The admin password has its own command.
    #[error("Use `password set` to change the admin password")]
    PasswordViaSettings,

    #[error(transparent)]
    Policy(#[from] PasswordPolicyError),

    /// Value rejected by the key's validator.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Connect to the database named by `DATABASE_URL`.
///
/// # Errors
///
/// Returns an error if the variable is unset or the connection fails.
pub async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(PgPool::connect(database_url.expose_secret()).await?)
}
