//! Admin password policy.
//!
//! The admin panel is protected by a single shared password stored in
//! `site_settings`. Until one is stored, the bootstrap password below is
//! accepted so the first operator can get in and set a real one.

/// Password accepted while no credential row exists.
pub const BOOTSTRAP_ADMIN_PASSWORD: &str = "admin123";

const MIN_LENGTH: usize = 8;
const MAX_LENGTH: usize = 100;
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";
const COMMON_PASSWORDS: &[&str] = &["password", "12345678", "admin123", "qwerty"];

/// Reasons a new admin password is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least 8 characters long")]
    TooShort,
    #[error("Password is too long (max 100 characters)")]
    TooLong,
    #[error("Password must contain at least one number or special character")]
    MissingNumberOrSpecial,
}

/// Outcome of a password that passed the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Strong,
    /// Accepted, but contains a well-known weak password.
    Common,
}

impl PasswordStrength {
    /// Message shown next to the password field.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Strong => "Password is strong",
            Self::Common => {
                "Warning: This password is common. Consider using a stronger password."
            }
        }
    }
}

/// Check a candidate admin password against the policy.
///
/// # Errors
///
/// Returns the first rule the candidate breaks.
///
/// ```
/// use cookshop_core::{PasswordPolicyError, PasswordStrength, validate_admin_password};
///
/// assert_eq!(validate_admin_password("short1"), Err(PasswordPolicyError::TooShort));
/// assert_eq!(validate_admin_password("pepperpot-7"), Ok(PasswordStrength::Strong));
/// assert_eq!(validate_admin_password("MyPassword1"), Ok(PasswordStrength::Common));
/// ```
pub fn validate_admin_password(candidate: &str) -> Result<PasswordStrength, PasswordPolicyError> {
    let length = candidate.chars().count();
    if length < MIN_LENGTH {
        return Err(PasswordPolicyError::TooShort);
    }
    if length > MAX_LENGTH {
        return Err(PasswordPolicyError::TooLong);
    }

    let has_number_or_special = candidate
        .chars()
        .any(|c| c.is_ascii_digit() || SPECIAL_CHARS.contains(c));
    if !has_number_or_special {
        return Err(PasswordPolicyError::MissingNumberOrSpecial);
    }

    let lower = candidate.to_lowercase();
    if COMMON_PASSWORDS.iter().any(|common| lower.contains(common)) {
        return Ok(PasswordStrength::Common);
    }

    Ok(PasswordStrength::Strong)
}
