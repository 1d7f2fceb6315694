//! Remote key-value settings store.
//!
//! Every piece of shared configuration, including the admin credential, lives
//! in one logical table of `(key, value)` rows. Reads select by key and writes
//! upsert on key conflict. Each row also carries a `version` that increases on
//! every write; the admin gate uses it to notice a rotated credential.
//!
//! # Implementations
//!
//! - [`MemorySettingsStore`] - In-process store for tests and local tooling
//! - `PgSettingsStore` - `PostgreSQL` `site_settings` table (feature `postgres`)

mod memory;
#[cfg(feature = "postgres")]
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use thiserror::Error;

pub use memory::MemorySettingsStore;
#[cfg(feature = "postgres")]
pub use postgres::PgSettingsStore;

use crate::types::settings::non_empty_str;

/// Errors that can occur while talking to the settings store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or refused the request.
    #[error("settings store unavailable: {0}")]
    Unavailable(String),

    /// The backing database returned an error.
    #[error("database error: {0}")]
    Database(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// A single row of the settings table.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingRow {
    pub key: String,
    pub value: JsonValue,
    /// Starts at 1 and increases by one on every upsert of this key.
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

impl SettingRow {
    /// The row value as a non-empty string, if it is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        non_empty_str(&self.value)
    }
}

/// Row-level contract of the remote settings table.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch a single row by key.
    async fn get(&self, key: &str) -> Result<Option<SettingRow>, StoreError>;

    /// Fetch every row.
    async fn list(&self) -> Result<Vec<SettingRow>, StoreError>;

    /// Insert or replace the value for `key`, bumping its version.
    async fn upsert(&self, key: &str, value: JsonValue) -> Result<SettingRow, StoreError>;

    /// Cheap connectivity check used by readiness probes.
    async fn ping(&self) -> Result<(), StoreError> {
        self.list().await.map(|_| ())
    }
}
