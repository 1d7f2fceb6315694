//! WhatsApp number handling for Guyana.
//!
//! Numbers are stored the way an operator typed them. The checkout link only
//! strips non-digits, while the CLI normalises and validates before saving.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Guyana country calling code.
const COUNTRY_CODE: &str = "592";

/// Errors from [`WhatsAppNumber::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WhatsAppNumberError {
    #[error("WhatsApp number is required")]
    Empty,
    #[error("Guyana number with country code should be 10 digits (592XXXXXXX)")]
    BadCountryCodeLength,
    #[error("Invalid number format. Use: 592XXXXXXX (10 digits) or XXXXXXX (7 digits)")]
    BadFormat,
}

/// A validated, normalised WhatsApp number (`592XXXXXXX`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WhatsAppNumber(String);

impl WhatsAppNumber {
    /// Validate and normalise operator input.
    ///
    /// Accepts `592XXXXXXX`, a 7-digit local number, or a 10-digit number with
    /// a leading `0`. Punctuation and spaces are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits or an unrecognised shape.
    ///
    /// ```
    /// use cookshop_core::WhatsAppNumber;
    ///
    /// assert_eq!(WhatsAppNumber::parse("600-1234").unwrap().as_str(), "5926001234");
    /// assert_eq!(WhatsAppNumber::parse("+592 600 1234").unwrap().as_str(), "5926001234");
    /// assert!(WhatsAppNumber::parse("12345").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, WhatsAppNumberError> {
        let digits = digits_only(input);

        if digits.is_empty() {
            return Err(WhatsAppNumberError::Empty);
        }

        if digits.starts_with(COUNTRY_CODE) {
            if digits.len() != 10 {
                return Err(WhatsAppNumberError::BadCountryCodeLength);
            }
            return Ok(Self(digits));
        }

        match digits.len() {
            7 => Ok(Self(format!("{COUNTRY_CODE}{digits}"))),
            10 if digits.starts_with('0') => Ok(Self(format!(
                "{COUNTRY_CODE}{}",
                digits.get(1..).unwrap_or_default()
            ))),
            _ => Err(WhatsAppNumberError::BadFormat),
        }
    }

    /// Best-effort normalisation without validation.
    ///
    /// Applies the same prefix rules as [`parse`](Self::parse) but falls back
    /// to the bare digits instead of failing.
    #[must_use]
    pub fn normalize(input: &str) -> String {
        Self::parse(input).map_or_else(|_| digits_only(input), Self::into_inner)
    }

    /// Human-friendly form, `+592-XXX-XXXX`.
    #[must_use]
    pub fn display(&self) -> String {
        match (self.0.get(..3), self.0.get(3..6), self.0.get(6..)) {
            (Some(cc), Some(head), Some(tail)) => format!("+{cc}-{head}-{tail}"),
            _ => format!("+{}", self.0),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for WhatsAppNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip every non-digit character.
#[must_use]
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}
