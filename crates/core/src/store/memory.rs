//! In-process settings store.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;

use super::{SettingRow, SettingsStore, StoreError};

/// A [`SettingsStore`] backed by a `HashMap`.
///
/// Mirrors the version semantics of the `PostgreSQL` table. It can also be
/// switched into an unavailable mode to exercise degraded paths.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    rows: RwLock<HashMap<String, SettingRow>>,
    unavailable: AtomicBool,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with string values.
    #[must_use]
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let now = Utc::now();
        let rows = values
            .into_iter()
            .map(|(key, value)| {
                (
                    key.to_owned(),
                    SettingRow {
                        key: key.to_owned(),
                        value: JsonValue::String(value.to_owned()),
                        version: 1,
                        updated_at: now,
                    },
                )
            })
            .collect();

        Self {
            rows: RwLock::new(rows),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        Ok(())
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".into())
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<SettingRow>, StoreError> {
        self.check_available()?;
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.get(key).cloned())
    }

    async fn list(&self) -> Result<Vec<SettingRow>, StoreError> {
        self.check_available()?;
        let rows = self.rows.read().map_err(poisoned)?;
        let mut all: Vec<SettingRow> = rows.values().cloned().collect();
        all.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(all)
    }

    async fn upsert(&self, key: &str, value: JsonValue) -> Result<SettingRow, StoreError> {
        self.check_available()?;
        let mut rows = self.rows.write().map_err(poisoned)?;
        let version = rows.get(key).map_or(1, |row| row.version + 1);
        let row = SettingRow {
            key: key.to_owned(),
            value,
            version,
            updated_at: Utc::now(),
        };
        rows.insert(key.to_owned(), row.clone());
        Ok(row)
    }
}
