//! `PostgreSQL` implementation of the settings store.
//!
//! # Table: `site_settings`
//!
//! ```sql
//! key        TEXT PRIMARY KEY
//! value      JSONB NOT NULL
//! version    BIGINT NOT NULL DEFAULT 1
//! updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
//! ```
//!
//! Migrations are stored in `crates/core/migrations/` and run via:
//! ```bash
//! cargo run -p cookshop-cli -- migrate
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use super::{SettingRow, SettingsStore, StoreError};

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(Box::new(err))
    }
}

/// Internal row type for `site_settings` queries.
#[derive(Debug, sqlx::FromRow)]
struct SiteSettingRow {
    key: String,
    value: JsonValue,
    version: i64,
    updated_at: DateTime<Utc>,
}

impl From<SiteSettingRow> for SettingRow {
    fn from(row: SiteSettingRow) -> Self {
        Self {
            key: row.key,
            value: row.value,
            version: row.version,
            updated_at: row.updated_at,
        }
    }
}

/// Settings store over the `site_settings` table.
#[derive(Debug, Clone)]
pub struct PgSettingsStore {
    pool: PgPool,
}

impl PgSettingsStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<SettingRow>, StoreError> {
        let row = sqlx::query_as::<_, SiteSettingRow>(
            r"
            SELECT key, value, version, updated_at
            FROM site_settings
            WHERE key = $1
            ",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SettingRow::from))
    }

    async fn list(&self) -> Result<Vec<SettingRow>, StoreError> {
        let rows = sqlx::query_as::<_, SiteSettingRow>(
            r"
            SELECT key, value, version, updated_at
            FROM site_settings
            ORDER BY key
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SettingRow::from).collect())
    }

    async fn upsert(&self, key: &str, value: JsonValue) -> Result<SettingRow, StoreError> {
        let row = sqlx::query_as::<_, SiteSettingRow>(
            r"
            INSERT INTO site_settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE
                SET value = EXCLUDED.value,
                    version = site_settings.version + 1,
                    updated_at = now()
            RETURNING key, value, version, updated_at
            ",
        )
        .bind(key)
        .bind(&value)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
