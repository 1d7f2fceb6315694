//! Application state shared across handlers.

use std::sync::Arc;

use cookshop_core::{Currency, SettingsStore};

use crate::config::StorefrontConfig;
use crate::services::SettingsReader;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the settings store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    settings_store: Arc<dyn SettingsStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, settings_store: Arc<dyn SettingsStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                settings_store,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Display currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.inner.config.currency
    }

    /// Get a reference to the remote settings store.
    #[must_use]
    pub fn settings_store(&self) -> &dyn SettingsStore {
        self.inner.settings_store.as_ref()
    }

    /// Reader for the public settings snapshot.
    #[must_use]
    pub fn settings(&self) -> SettingsReader<'_> {
        SettingsReader::new(self.settings_store())
    }
}
