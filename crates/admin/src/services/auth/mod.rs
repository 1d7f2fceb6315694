//! Admin authentication service.
//!
//! The admin panel is protected by one shared password kept in the
//! `site_settings` row `admin_password`. When no such row exists the panel is
//! in first-run mode and the bootstrap password is accepted instead.
//!
//! Every remote failure is absorbed here: reads degrade to "no credential",
//! so callers only ever see booleans or a [`PasswordChangeError`].

mod error;
mod persistence;

pub use error::{AuthPersistenceError, PasswordChangeError};
pub use persistence::{AuthPersistence, MemoryAuthPersistence};

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value as JsonValue;
use tracing::instrument;

use cookshop_core::{
    BOOTSTRAP_ADMIN_PASSWORD, PasswordStrength, SettingKey, SettingsStore, validate_admin_password,
};

use crate::models::AuthSession;

/// Whether an admin credential is stored remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    /// No credential row (or an empty one): first-run mode.
    Absent,
    /// A credential row exists at this version.
    Present { version: i64 },
}

/// The stored credential, read once per operation.
struct StoredCredential {
    value: String,
    version: i64,
}

impl StoredCredential {
    fn accepts(credential: Option<&Self>, candidate: &str) -> bool {
        credential.map_or(BOOTSTRAP_ADMIN_PASSWORD, |c| c.value.as_str()) == candidate
    }
}

/// Authentication state of one browser, plus the credential checks.
///
/// Constructed only through [`rehydrate`](Self::rehydrate), so the persisted
/// state is always loaded before anything reads it.
pub struct AdminAuthStore<P> {
    settings: Arc<dyn SettingsStore>,
    persistence: P,
    session: AuthSession,
}

impl<P: AuthPersistence> AdminAuthStore<P> {
    /// Load the persisted auth state.
    ///
    /// An unreadable state is treated as logged out.
    pub async fn rehydrate(settings: Arc<dyn SettingsStore>, persistence: P) -> Self {
        let session = match persistence.load().await {
            Ok(session) => session.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load admin auth state, treating as logged out");
                AuthSession::default()
            }
        };

        Self {
            settings,
            persistence,
            session,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    #[must_use]
    pub const fn login_timestamp(&self) -> Option<i64> {
        self.session.login_timestamp
    }

    #[must_use]
    pub const fn session(&self) -> &AuthSession {
        &self.session
    }

    #[must_use]
    pub const fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Whether a credential is stored, and at which version.
    pub async fn credential_state(&self) -> CredentialState {
        self.fetch_credential()
            .await
            .map_or(CredentialState::Absent, |c| CredentialState::Present {
                version: c.version,
            })
    }

    /// True iff a non-empty credential is stored remotely.
    pub async fn has_password_in_database(&self) -> bool {
        matches!(self.credential_state().await, CredentialState::Present { .. })
    }

    /// Check a candidate against the stored credential, or the bootstrap
    /// password when none is stored. Exact, case-sensitive comparison.
    #[instrument(skip_all)]
    pub async fn check_password(&self, candidate: &str) -> bool {
        let credential = self.fetch_credential().await;
        StoredCredential::accepts(credential.as_ref(), candidate)
    }

    /// Log in with `candidate`. State is untouched on failure.
    #[instrument(skip_all)]
    pub async fn login(&mut self, candidate: &str) -> bool {
        let credential = self.fetch_credential().await;
        if !StoredCredential::accepts(credential.as_ref(), candidate) {
            tracing::warn!("Admin login rejected");
            return false;
        }

        self.session = AuthSession::authenticated(
            Utc::now().timestamp(),
            credential.map(|c| c.version),
        );
        self.persist().await;
        tracing::info!(first_run = self.session.credential_epoch.is_none(), "Admin logged in");
        true
    }

    /// Clear the authenticated flag and login time.
    #[instrument(skip_all)]
    pub async fn logout(&mut self) {
        self.session = AuthSession::default();
        if let Err(e) = self.persistence.clear().await {
            tracing::warn!(error = %e, "Failed to clear admin auth state");
        }
        tracing::info!("Admin logged out");
    }

    /// Rotate the admin credential.
    ///
    /// On success every session, this one included, has to log in again: this
    /// one is cleared here, the others notice the new credential version on
    /// their next gate evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordChangeError`] if the new password breaks the policy,
    /// the current password is wrong, or the new value cannot be stored.
    #[instrument(skip_all)]
    pub async fn change_password(
        &mut self,
        current_password: &str,
        new_password: &str,
    ) -> Result<PasswordStrength, PasswordChangeError> {
        let strength = validate_admin_password(new_password)?;

        if !self.check_password(current_password).await {
            tracing::warn!("Password change rejected: current password mismatch");
            return Err(PasswordChangeError::InvalidCurrentPassword);
        }

        let row = self
            .settings
            .upsert(
                SettingKey::AdminPassword.as_str(),
                JsonValue::String(new_password.to_owned()),
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to store new admin password");
                PasswordChangeError::Unavailable
            })?;

        self.force_logout().await;
        tracing::info!(version = row.version, "Admin password rotated");
        Ok(strength)
    }

    /// Drop authentication without touching the credential.
    pub(crate) async fn force_logout(&mut self) {
        self.session = AuthSession::default();
        self.persist().await;
    }

    async fn fetch_credential(&self) -> Option<StoredCredential> {
        match self.settings.get(SettingKey::AdminPassword.as_str()).await {
            // Blank means absent, but a present credential is compared verbatim
            Ok(row) => row.and_then(|row| {
                row.value
                    .as_str()
                    .filter(|value| !value.trim().is_empty())
                    .map(|value| StoredCredential {
                        value: value.to_owned(),
                        version: row.version,
                    })
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Admin credential unavailable, using first-run mode");
                None
            }
        }
    }

    async fn persist(&self) {
        if let Err(e) = self.persistence.save(&self.session).await {
            tracing::warn!(error = %e, "Failed to persist admin auth state");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cookshop_core::{MemorySettingsStore, PasswordPolicyError};

    use super::*;

    async fn store_with(
        values: &[(&str, &str)],
    ) -> (Arc<MemorySettingsStore>, AdminAuthStore<MemoryAuthPersistence>) {
        let settings = Arc::new(MemorySettingsStore::with_values(values.iter().copied()));
        let auth = AdminAuthStore::rehydrate(settings.clone(), MemoryAuthPersistence::new()).await;
        (settings, auth)
    }

    #[tokio::test]
    async fn test_bootstrap_password_only_without_credential() {
        let (_, auth) = store_with(&[]).await;
        assert!(auth.check_password("admin123").await);
        assert!(!auth.check_password("Admin123").await);
        assert!(!auth.check_password("").await);
        assert!(!auth.has_password_in_database().await);
    }

    #[tokio::test]
    async fn test_stored_credential_replaces_bootstrap() {
        let (_, auth) = store_with(&[("admin_password", "pepperpot-7")]).await;
        assert!(auth.check_password("pepperpot-7").await);
        assert!(!auth.check_password("admin123").await);
        assert!(auth.has_password_in_database().await);
    }

    #[tokio::test]
    async fn test_empty_credential_counts_as_absent() {
        let (_, auth) = store_with(&[("admin_password", "")]).await;
        assert!(!auth.has_password_in_database().await);
        assert!(auth.check_password("admin123").await);
    }

    #[tokio::test]
    async fn test_login_persists_and_failure_leaves_state() {
        let (_, mut auth) = store_with(&[("admin_password", "pepperpot-7")]).await;

        assert!(!auth.login("wrong").await);
        assert!(!auth.is_authenticated());
        assert!(auth.persistence().snapshot().is_none());

        assert!(auth.login("pepperpot-7").await);
        assert!(auth.is_authenticated());
        assert!(auth.login_timestamp().is_some());

        let saved = auth.persistence().snapshot().unwrap();
        assert!(saved.is_authenticated);
        assert_eq!(saved.credential_epoch, Some(1));
    }

    #[tokio::test]
    async fn test_rehydrate_reads_persisted_state() {
        let settings: Arc<dyn SettingsStore> = Arc::new(MemorySettingsStore::new());
        let slot = MemoryAuthPersistence::with_session(AuthSession::authenticated(42, None));

        let auth = AdminAuthStore::rehydrate(settings, slot).await;
        assert!(auth.is_authenticated());
        assert_eq!(auth.login_timestamp(), Some(42));
    }

    #[tokio::test]
    async fn test_logout_clears_state() {
        let (_, mut auth) = store_with(&[]).await;
        assert!(auth.login("admin123").await);
        auth.logout().await;

        assert!(!auth.is_authenticated());
        assert_eq!(auth.login_timestamp(), None);
        assert!(auth.persistence().snapshot().is_none());
    }

    #[tokio::test]
    async fn test_change_password_rotates_and_logs_out() {
        let (_, mut auth) = store_with(&[("admin_password", "pepperpot-7")]).await;
        assert!(auth.login("pepperpot-7").await);

        let strength = auth.change_password("pepperpot-7", "cassava-bread-9").await.unwrap();
        assert_eq!(strength, PasswordStrength::Strong);

        assert!(!auth.is_authenticated());
        assert!(!auth.persistence().snapshot().unwrap().is_authenticated);
        assert!(!auth.check_password("pepperpot-7").await);
        assert!(auth.check_password("cassava-bread-9").await);
        assert_eq!(
            auth.credential_state().await,
            CredentialState::Present { version: 2 }
        );
    }

    #[tokio::test]
    async fn test_credential_whitespace_is_significant() {
        let (_, mut auth) = store_with(&[("admin_password", "pepperpot-7")]).await;

        auth.change_password("pepperpot-7", "cassava-bread-9 ").await.unwrap();
        assert!(auth.check_password("cassava-bread-9 ").await);
        assert!(!auth.check_password("cassava-bread-9").await);
        assert!(auth.login("cassava-bread-9 ").await);

        let (_, auth) = store_with(&[("admin_password", "  pepperpot-7")]).await;
        assert!(auth.check_password("  pepperpot-7").await);
        assert!(!auth.check_password("pepperpot-7").await);
    }

    #[tokio::test]
    async fn test_blank_credential_counts_as_absent() {
        let (_, auth) = store_with(&[("admin_password", "   ")]).await;
        assert!(!auth.has_password_in_database().await);
        assert!(auth.check_password("admin123").await);
        assert!(!auth.check_password("   ").await);
    }

    #[tokio::test]
    async fn test_change_password_validation_failures_change_nothing() {
        let (settings, mut auth) = store_with(&[("admin_password", "pepperpot-7")]).await;
        assert!(auth.login("pepperpot-7").await);

        let err = auth.change_password("wrong", "cassava-bread-9").await.unwrap_err();
        assert!(matches!(err, PasswordChangeError::InvalidCurrentPassword));

        let err = auth.change_password("pepperpot-7", "short").await.unwrap_err();
        assert!(matches!(
            err,
            PasswordChangeError::Policy(PasswordPolicyError::TooShort)
        ));

        assert!(auth.is_authenticated());
        let row = settings.get("admin_password").await.unwrap().unwrap();
        assert_eq!(row.version, 1);
    }

    #[tokio::test]
    async fn test_unavailable_store_degrades_to_bootstrap() {
        let (settings, mut auth) = store_with(&[("admin_password", "pepperpot-7")]).await;
        settings.set_unavailable(true);

        assert!(!auth.has_password_in_database().await);
        assert!(auth.check_password("admin123").await);

        let err = auth.change_password("admin123", "cassava-bread-9").await.unwrap_err();
        assert!(matches!(err, PasswordChangeError::Unavailable));
        assert!(!auth.is_authenticated());
    }
}
