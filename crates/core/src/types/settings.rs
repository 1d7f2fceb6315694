//! Site settings snapshot.
//!
//! Settings are stored as loose key/value rows in `site_settings`. This module
//! turns them into an explicit structure where every field is optional and
//! absence is visible in the type.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Name shown when no business name is configured.
pub const FALLBACK_BUSINESS_NAME: &str = "cook-shop";

/// Keys of the `site_settings` table the application knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    BusinessName,
    WhatsAppNumber,
    LogoUrl,
    Theme,
    AdminPassword,
}

impl SettingKey {
    /// Keys that make up the public [`Settings`] snapshot.
    pub const PUBLIC: [Self; 4] = [
        Self::BusinessName,
        Self::WhatsAppNumber,
        Self::LogoUrl,
        Self::Theme,
    ];

    /// Row key in the store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BusinessName => "business_name",
            Self::WhatsAppNumber => "whatsapp_number",
            Self::LogoUrl => "logo_url",
            Self::Theme => "theme",
            Self::AdminPassword => "admin_password",
        }
    }

    /// Parse a row key. Unknown keys return `None`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "business_name" => Some(Self::BusinessName),
            "whatsapp_number" => Some(Self::WhatsAppNumber),
            "logo_url" => Some(Self::LogoUrl),
            "theme" => Some(Self::Theme),
            "admin_password" => Some(Self::AdminPassword),
            _ => None,
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Colour theme of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// Error returned when a theme name is not recognised.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown theme: {0} (expected light or dark)")]
pub struct ParseThemeError(String);

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ParseThemeError(other.to_owned())),
        }
    }
}

/// Read-only settings snapshot, fetched fresh per page view.
///
/// The admin password is deliberately not part of this structure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub business_name: Option<String>,
    pub whatsapp_number: Option<String>,
    pub logo_url: Option<String>,
    pub theme: Option<Theme>,
}

impl Settings {
    /// Build a snapshot from raw `(key, value)` rows.
    ///
    /// Unknown keys and non-string values are ignored, empty strings count as
    /// absent, and an unrecognised theme is treated as unset.
    #[must_use]
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a JsonValue)>,
    {
        let mut settings = Self::default();
        for (key, value) in rows {
            let Some(text) = non_empty_str(value) else {
                continue;
            };
            match SettingKey::from_key(key) {
                Some(SettingKey::BusinessName) => settings.business_name = Some(text.to_owned()),
                Some(SettingKey::WhatsAppNumber) => {
                    settings.whatsapp_number = Some(text.to_owned());
                }
                Some(SettingKey::LogoUrl) => settings.logo_url = Some(text.to_owned()),
                Some(SettingKey::Theme) => settings.theme = text.parse().ok(),
                Some(SettingKey::AdminPassword) | None => {}
            }
        }
        settings
    }

    /// The business name, or [`FALLBACK_BUSINESS_NAME`] when unset.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.business_name.as_deref().unwrap_or(FALLBACK_BUSINESS_NAME)
    }
}

/// The trimmed string inside a JSON string value, if non-empty.
#[must_use]
pub fn non_empty_str(value: &JsonValue) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_rows_maps_known_keys() {
        let rows = [
            ("business_name".to_owned(), json!("Auntie's Kitchen")),
            ("whatsapp_number".to_owned(), json!("+592 600-1234")),
            ("theme".to_owned(), json!("dark")),
            ("logo_url".to_owned(), json!("")),
            ("admin_password".to_owned(), json!("hunter22!")),
            ("something_else".to_owned(), json!("ignored")),
        ];

        let settings = Settings::from_rows(rows.iter().map(|(k, v)| (k.as_str(), v)));

        assert_eq!(settings.business_name.as_deref(), Some("Auntie's Kitchen"));
        assert_eq!(settings.whatsapp_number.as_deref(), Some("+592 600-1234"));
        assert_eq!(settings.theme, Some(Theme::Dark));
        assert_eq!(settings.logo_url, None);
    }

    #[test]
    fn test_display_name_falls_back() {
        assert_eq!(Settings::default().display_name(), "cook-shop");
        let value = json!("Auntie's Kitchen");
        let settings = Settings::from_rows([("business_name", &value)]);
        assert_eq!(settings.display_name(), "Auntie's Kitchen");
    }

    #[test]
    fn test_unknown_theme_is_unset() {
        let value = json!("solarized");
        let settings = Settings::from_rows([("theme", &value)]);
        assert_eq!(settings.theme, None);
    }

    #[test]
    fn test_setting_key_roundtrip() {
        for key in SettingKey::PUBLIC {
            assert_eq!(SettingKey::from_key(key.as_str()), Some(key));
        }
        assert_eq!(
            SettingKey::from_key("admin_password"),
            Some(SettingKey::AdminPassword)
        );
    }
}
