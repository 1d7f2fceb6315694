//! Whole-unit money and currency formatting.
//!
//! Prices in the shop are whole currency units (Guyana dollars have no
//! circulating cents), so amounts are plain unsigned integers. Arithmetic
//! saturates: a cart can never wrap around to a small total.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// An amount of money in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Create an amount from whole units.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Get the amount in whole units.
    #[must_use]
    pub const fn amount(self) -> u64 {
        self.0
    }

    /// Multiply by a quantity, saturating at `u64::MAX`.
    #[must_use]
    pub const fn times(self, qty: u32) -> Self {
        Self(self.0.saturating_mul(qty as u64))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<u64> for Money {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

/// Currencies the shop can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Guyana dollar.
    #[default]
    Gyd,
    /// US dollar.
    Usd,
}

/// Error returned when a currency code is not supported.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unsupported currency: {0} (expected GYD or USD)")]
pub struct ParseCurrencyError(String);

impl Currency {
    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Gyd => "GYD",
            Self::Usd => "USD",
        }
    }

    /// Format an amount for display.
    ///
    /// ```
    /// use cookshop_core::{Currency, Money};
    ///
    /// assert_eq!(Currency::Gyd.format(Money::new(1500)), "GYD $1,500");
    /// assert_eq!(Currency::Usd.format(Money::new(1500)), "$1,500");
    /// ```
    #[must_use]
    pub fn format(self, money: Money) -> String {
        let digits = group_thousands(money.amount());
        match self {
            Self::Gyd => format!("GYD ${digits}"),
            Self::Usd => format!("${digits}"),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ParseCurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GYD" => Ok(Self::Gyd),
            "USD" => Ok(Self::Usd),
            _ => Err(ParseCurrencyError(s.to_owned())),
        }
    }
}

/// Insert `,` between groups of three digits.
fn group_thousands(amount: u64) -> String {
    let raw = amount.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
