//! Site settings commands.
//!
//! # Usage
//!
//! ```bash
//! cookshop-cli settings set business_name "Auntie's Kitchen"
//! cookshop-cli settings set whatsapp_number "600-1234"
//! cookshop-cli settings set theme dark
//! cookshop-cli settings show
//! ```

use serde_json::Value as JsonValue;
use url::Url;

use cookshop_core::{SettingKey, SettingRow, SettingsStore, Theme, WhatsAppNumber};

use super::CliError;

/// Check and normalise a value before it is stored.
///
/// WhatsApp numbers are stored as `592XXXXXXX` and themes in lowercase.
///
/// # Errors
///
/// Returns an error for unknown keys, the admin password key, and values the
/// key's validator rejects.
pub fn validate(key: &str, value: &str) -> Result<(SettingKey, String), CliError> {
    let setting = SettingKey::from_key(key).ok_or_else(|| CliError::UnknownSetting(key.to_owned()))?;
    let value = value.trim();

    let normalized = match setting {
        SettingKey::AdminPassword => return Err(CliError::PasswordViaSettings),
        SettingKey::WhatsAppNumber => WhatsAppNumber::parse(value)
            .map_err(|e| invalid(setting, e))?
            .into_inner(),
        SettingKey::Theme => value
            .parse::<Theme>()
            .map_err(|e| invalid(setting, e))?
            .as_str()
            .to_owned(),
        SettingKey::LogoUrl => Url::parse(value).map_err(|e| invalid(setting, e))?.into(),
        SettingKey::BusinessName => {
            if value.is_empty() {
                return Err(invalid(setting, "must not be empty"));
            }
            value.to_owned()
        }
    };

    Ok((setting, normalized))
}

fn invalid(key: SettingKey, reason: impl ToString) -> CliError {
    CliError::InvalidValue {
        key: key.as_str(),
        reason: reason.to_string(),
    }
}

/// Validate and upsert a setting.
///
/// # Errors
///
/// Returns validation errors from [`validate`] or the store's error.
pub async fn set(store: &dyn SettingsStore, key: &str, value: &str) -> Result<SettingRow, CliError> {
    let (setting, normalized) = validate(key, value)?;
    let row = store
        .upsert(setting.as_str(), JsonValue::String(normalized))
        .await?;
    tracing::info!(key = %setting, version = row.version, "Setting saved");
    Ok(row)
}

/// One display line per stored setting, sorted by key.
///
/// The admin password is reported as set, never printed.
///
/// # Errors
///
/// Returns the store's error.
pub async fn show(store: &dyn SettingsStore) -> Result<Vec<String>, CliError> {
    let mut rows = store.list().await?;
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    Ok(rows
        .iter()
        .map(|row| match SettingKey::from_key(&row.key) {
            Some(SettingKey::AdminPassword) => format!(
                "{} = {} (version {})",
                row.key,
                if row.as_str().is_some() { "<set>" } else { "<empty>" },
                row.version
            ),
            Some(SettingKey::WhatsAppNumber) => {
                let shown = row
                    .as_str()
                    .and_then(|n| WhatsAppNumber::parse(n).ok())
                    .map_or_else(|| row.value.to_string(), |n| n.display());
                format!("{} = {shown}", row.key)
            }
            _ => format!("{} = {}", row.key, row.as_str().unwrap_or("<empty>")),
        })
        .collect())
}
