//! Admin gate: decides whether a request sees protected pages or the login
//! prompt.
//!
//! ```text
//! Initializing --rehydrate--> Checking --credential check--> RequiresLogin
//!                                                         \-> Authenticated
//! RequiresLogin --login--> Authenticated
//! Authenticated --logout--> Checking --> ...
//! any --password change--> RequiresLogin
//! ```
//!
//! A session that logged in against an older credential version is cleared
//! when it is next evaluated, so rotating the password logs out every browser.

use std::sync::Arc;

use serde::Serialize;

use cookshop_core::{PasswordStrength, SettingsStore};

use crate::services::{AdminAuthStore, AuthPersistence, CredentialState, PasswordChangeError};

/// Gate lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Persisted auth state not loaded yet.
    Initializing,
    /// Auth state loaded; checking whether a credential exists.
    Checking,
    RequiresLogin,
    Authenticated,
}

/// What the gate lets the page render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateView {
    /// Neither protected content nor the login form.
    Loading,
    LoginPrompt,
    Protected,
}

impl GateState {
    #[must_use]
    pub const fn view(self) -> GateView {
        match self {
            Self::Initializing | Self::Checking => GateView::Loading,
            Self::RequiresLogin => GateView::LoginPrompt,
            Self::Authenticated => GateView::Protected,
        }
    }
}

/// The gate for one browser session.
pub struct AdminGate<P> {
    state: GateState,
    auth: AdminAuthStore<P>,
}

impl<P: AuthPersistence> AdminGate<P> {
    /// Rehydrate the auth state, then resolve the gate.
    ///
    /// The credential check only starts once rehydration has finished.
    pub async fn initialize(settings: Arc<dyn SettingsStore>, persistence: P) -> Self {
        tracing::trace!(state = ?GateState::Initializing, "Admin gate starting");
        let auth = AdminAuthStore::rehydrate(settings, persistence).await;
        let mut gate = Self {
            state: GateState::Checking,
            auth,
        };
        gate.evaluate().await;
        gate
    }

    #[must_use]
    pub const fn state(&self) -> GateState {
        self.state
    }

    #[must_use]
    pub const fn view(&self) -> GateView {
        self.state.view()
    }

    #[must_use]
    pub const fn auth(&self) -> &AdminAuthStore<P> {
        &self.auth
    }

    /// Try to log in. Moves to `Authenticated` on success without checking
    /// the credential's existence again.
    pub async fn submit_login(&mut self, candidate: &str) -> bool {
        let ok = self.auth.login(candidate).await;
        if ok {
            self.state = GateState::Authenticated;
        }
        ok
    }

    /// Log out and re-evaluate. In first-run mode this lands straight back
    /// in `Authenticated`.
    pub async fn logout(&mut self) {
        self.auth.logout().await;
        self.evaluate().await;
    }

    /// Rotate the credential. On success the gate requires a fresh login.
    ///
    /// # Errors
    ///
    /// Propagates [`PasswordChangeError`]; the gate state is unchanged then.
    pub async fn change_password(
        &mut self,
        current_password: &str,
        new_password: &str,
    ) -> Result<PasswordStrength, PasswordChangeError> {
        let strength = self
            .auth
            .change_password(current_password, new_password)
            .await?;
        self.state = GateState::RequiresLogin;
        Ok(strength)
    }

    async fn evaluate(&mut self) {
        self.state = GateState::Checking;

        self.state = match self.auth.credential_state().await {
            CredentialState::Absent => GateState::Authenticated,
            CredentialState::Present { version } => {
                let session = self.auth.session();
                if session.is_authenticated && session.credential_epoch != Some(version) {
                    tracing::info!(
                        session_epoch = ?session.credential_epoch,
                        credential_version = version,
                        "Admin credential changed since login, clearing session"
                    );
                    self.auth.force_logout().await;
                }

                if self.auth.is_authenticated() {
                    GateState::Authenticated
                } else {
                    GateState::RequiresLogin
                }
            }
        };
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cookshop_core::MemorySettingsStore;
    use serde_json::json;

    use super::*;
    use crate::models::AuthSession;
    use crate::services::MemoryAuthPersistence;

    fn settings(values: &[(&str, &str)]) -> Arc<MemorySettingsStore> {
        Arc::new(MemorySettingsStore::with_values(values.iter().copied()))
    }

    #[test]
    fn test_view_mapping() {
        assert_eq!(GateState::Initializing.view(), GateView::Loading);
        assert_eq!(GateState::Checking.view(), GateView::Loading);
        assert_eq!(GateState::RequiresLogin.view(), GateView::LoginPrompt);
        assert_eq!(GateState::Authenticated.view(), GateView::Protected);
    }

    #[tokio::test]
    async fn test_credential_present_without_login_requires_login() {
        let gate = AdminGate::initialize(
            settings(&[("admin_password", "pepperpot-7")]),
            MemoryAuthPersistence::new(),
        )
        .await;
        assert_eq!(gate.state(), GateState::RequiresLogin);
    }

    #[tokio::test]
    async fn test_first_run_is_open() {
        let gate = AdminGate::initialize(settings(&[]), MemoryAuthPersistence::new()).await;
        assert_eq!(gate.state(), GateState::Authenticated);
        assert!(!gate.auth().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_then_resume() {
        let store = settings(&[("admin_password", "pepperpot-7")]);
        let browser = MemoryAuthPersistence::new();

        let mut gate = AdminGate::initialize(store.clone(), browser.clone()).await;
        assert!(!gate.submit_login("nope").await);
        assert_eq!(gate.state(), GateState::RequiresLogin);
        assert!(gate.submit_login("pepperpot-7").await);
        assert_eq!(gate.state(), GateState::Authenticated);

        let resumed = AdminGate::initialize(store, browser).await;
        assert_eq!(resumed.state(), GateState::Authenticated);
    }

    #[tokio::test]
    async fn test_stale_epoch_is_cleared_once() {
        let store = settings(&[("admin_password", "pepperpot-7")]);
        store.upsert("admin_password", json!("cassava-bread-9")).await.unwrap();

        // Logged in against version 1, credential is now version 2.
        let browser =
            MemoryAuthPersistence::with_session(AuthSession::authenticated(1_700_000_000, Some(1)));

        let gate = AdminGate::initialize(store.clone(), browser.clone()).await;
        assert_eq!(gate.state(), GateState::RequiresLogin);
        assert!(!browser.snapshot().unwrap().is_authenticated);

        let mut gate = AdminGate::initialize(store, browser).await;
        assert!(gate.submit_login("cassava-bread-9").await);
        assert_eq!(gate.state(), GateState::Authenticated);
    }

    #[tokio::test]
    async fn test_bootstrap_session_cleared_once_password_is_set() {
        let store = settings(&[]);
        let browser = MemoryAuthPersistence::new();

        let mut gate = AdminGate::initialize(store.clone(), browser.clone()).await;
        assert!(gate.submit_login("admin123").await);

        store.upsert("admin_password", json!("pepperpot-7")).await.unwrap();

        let gate = AdminGate::initialize(store, browser).await;
        assert_eq!(gate.state(), GateState::RequiresLogin);
    }

    #[tokio::test]
    async fn test_change_password_logs_out_every_browser() {
        let store = settings(&[("admin_password", "pepperpot-7")]);
        let first = MemoryAuthPersistence::new();
        let second = MemoryAuthPersistence::new();

        let mut gate_a = AdminGate::initialize(store.clone(), first.clone()).await;
        assert!(gate_a.submit_login("pepperpot-7").await);
        let mut gate_b = AdminGate::initialize(store.clone(), second.clone()).await;
        assert!(gate_b.submit_login("pepperpot-7").await);

        gate_a
            .change_password("pepperpot-7", "cassava-bread-9")
            .await
            .unwrap();
        assert_eq!(gate_a.state(), GateState::RequiresLogin);

        let gate_b = AdminGate::initialize(store, second).await;
        assert_eq!(gate_b.state(), GateState::RequiresLogin);
    }

    #[tokio::test]
    async fn test_logout_reevaluates() {
        let store = settings(&[("admin_password", "pepperpot-7")]);
        let mut gate = AdminGate::initialize(store, MemoryAuthPersistence::new()).await;
        assert!(gate.submit_login("pepperpot-7").await);

        gate.logout().await;
        assert_eq!(gate.state(), GateState::RequiresLogin);

        let mut open = AdminGate::initialize(settings(&[]), MemoryAuthPersistence::new()).await;
        open.logout().await;
        assert_eq!(open.state(), GateState::Authenticated);
    }
}
