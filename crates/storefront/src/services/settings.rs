//! Settings reader.
//!
//! Fetches the public settings snapshot for a page view. The store being down
//! is not the shopper's problem: any failure yields empty settings.

use cookshop_core::{Settings, SettingsStore};
use tracing::instrument;

/// Reads the public [`Settings`] snapshot from the settings store.
pub struct SettingsReader<'a> {
    store: &'a dyn SettingsStore,
}

impl<'a> SettingsReader<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn SettingsStore) -> Self {
        Self { store }
    }

    /// Fetch a fresh snapshot. Never fails.
    #[instrument(skip(self))]
    pub async fn get_settings(&self) -> Settings {
        match self.store.list().await {
            Ok(rows) => Settings::from_rows(rows.iter().map(|row| (row.key.as_str(), &row.value))),
            Err(e) => {
                tracing::warn!(error = %e, "Settings unavailable, using defaults");
                Settings::default()
            }
        }
    }
}
