//! Admin authentication error types.

use thiserror::Error;

use cookshop_core::PasswordPolicyError;

/// Reasons a password change is refused.
///
/// None of these leave any state changed.
#[derive(Debug, Error)]
pub enum PasswordChangeError {
    /// The current password did not match.
    #[error("Current password is incorrect")]
    InvalidCurrentPassword,

    /// The new password breaks the password policy.
    #[error(transparent)]
    Policy(#[from] PasswordPolicyError),

    /// The new credential could not be written.
    #[error("Could not save the new password, please try again")]
    Unavailable,
}

/// Errors from an [`AuthPersistence`](super::AuthPersistence) backend.
#[derive(Debug, Error)]
pub enum AuthPersistenceError {
    /// Session store failure.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// In-memory slot failure.
    #[error("auth state unavailable: {0}")]
    Unavailable(String),
}
