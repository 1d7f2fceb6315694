//! Application state shared across handlers.

use std::sync::Arc;

use cookshop_core::SettingsStore;

use crate::config::AdminConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    settings_store: Arc<dyn SettingsStore>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AdminConfig, settings_store: Arc<dyn SettingsStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                settings_store,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// The remote settings store holding the admin credential.
    #[must_use]
    pub fn settings_store(&self) -> &dyn SettingsStore {
        self.inner.settings_store.as_ref()
    }

    /// Shared handle to the settings store, for per-request auth stores.
    #[must_use]
    pub fn settings_store_arc(&self) -> Arc<dyn SettingsStore> {
        Arc::clone(&self.inner.settings_store)
    }
}
