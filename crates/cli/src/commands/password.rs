//! Admin password recovery.
//!
//! # Usage
//!
//! ```bash
//! cookshop-cli password set 'new-password-42'
//! ```
//!
//! Writing the credential bumps its version, so every admin session is
//! logged out on its next request.

use serde_json::Value as JsonValue;

use cookshop_core::{
    PasswordStrength, SettingKey, SettingRow, SettingsStore, validate_admin_password,
};

use super::CliError;

/// Validate and store a new admin password.
///
/// Unlike the admin panel this does not ask for the current password: it is
/// the recovery path for an operator with database access.
///
/// # Errors
///
/// Returns a policy error before anything is written, or the store's error.
pub async fn set(
    store: &dyn SettingsStore,
    new_password: &str,
) -> Result<(SettingRow, PasswordStrength), CliError> {
    let strength = validate_admin_password(new_password)?;
    let row = store
        .upsert(
            SettingKey::AdminPassword.as_str(),
            JsonValue::String(new_password.to_owned()),
        )
        .await?;

    tracing::info!(version = row.version, "Admin password updated");
    if strength == PasswordStrength::Common {
        tracing::warn!("{}", strength.message());
    }
    Ok((row, strength))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cookshop_core::{MemorySettingsStore, PasswordPolicyError};

    use super::*;

    #[tokio::test]
    async fn test_set_bumps_version() {
        let store = MemorySettingsStore::with_values([("admin_password", "pepperpot-7")]);

        let (row, strength) = set(&store, "cassava-bread-9").await.unwrap();
        assert_eq!(row.version, 2);
        assert_eq!(row.as_str(), Some("cassava-bread-9"));
        assert_eq!(strength, PasswordStrength::Strong);
    }

    #[tokio::test]
    async fn test_policy_checked_before_write() {
        let store = MemorySettingsStore::new();

        assert!(matches!(
            set(&store, "short1").await,
            Err(CliError::Policy(PasswordPolicyError::TooShort))
        ));
        assert!(store.get("admin_password").await.unwrap().is_none());

        let (_, strength) = set(&store, "Password-1").await.unwrap();
        assert_eq!(strength, PasswordStrength::Common);
    }
}
