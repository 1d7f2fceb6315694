//! Durable storage for the admin [`AuthSession`].

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tower_sessions::Session;

use super::AuthPersistenceError;
use crate::models::{AuthSession, session_keys};

/// Where the auth state of one browser lives between requests.
#[async_trait]
pub trait AuthPersistence: Send + Sync {
    /// Read the persisted state, if any.
    async fn load(&self) -> Result<Option<AuthSession>, AuthPersistenceError>;

    /// Replace the persisted state.
    async fn save(&self, session: &AuthSession) -> Result<(), AuthPersistenceError>;

    /// Drop the persisted state.
    async fn clear(&self) -> Result<(), AuthPersistenceError>;
}

#[async_trait]
impl AuthPersistence for Session {
    async fn load(&self) -> Result<Option<AuthSession>, AuthPersistenceError> {
        Ok(self.get::<AuthSession>(session_keys::ADMIN_AUTH).await?)
    }

    async fn save(&self, session: &AuthSession) -> Result<(), AuthPersistenceError> {
        self.insert(session_keys::ADMIN_AUTH, session).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthPersistenceError> {
        self.remove::<AuthSession>(session_keys::ADMIN_AUTH).await?;
        Ok(())
    }
}

/// A persisted-state slot held in memory.
///
/// Clones share the slot, so each slot models one browser's storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuthPersistence {
    slot: Arc<Mutex<Option<AuthSession>>>,
}

impl MemoryAuthPersistence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that already holds `session`.
    #[must_use]
    pub fn with_session(session: AuthSession) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(session))),
        }
    }

    /// Current slot contents.
    #[must_use]
    pub fn snapshot(&self) -> Option<AuthSession> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<AuthSession>>, AuthPersistenceError> {
        self.slot
            .lock()
            .map_err(|_| AuthPersistenceError::Unavailable("auth slot lock poisoned".into()))
    }
}

#[async_trait]
impl AuthPersistence for MemoryAuthPersistence {
    async fn load(&self) -> Result<Option<AuthSession>, AuthPersistenceError> {
        Ok(self.lock()?.clone())
    }

    async fn save(&self, session: &AuthSession) -> Result<(), AuthPersistenceError> {
        *self.lock()? = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthPersistenceError> {
        *self.lock()? = None;
        Ok(())
    }
}
