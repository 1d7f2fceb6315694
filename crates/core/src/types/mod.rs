//! Core types for Cookshop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod money;
pub mod password;
pub mod settings;
pub mod whatsapp;

pub use cart::{Cart, CartItem, CartProduct};
pub use id::*;
pub use money::{Currency, Money, ParseCurrencyError};
pub use password::{
    BOOTSTRAP_ADMIN_PASSWORD, PasswordPolicyError, PasswordStrength, validate_admin_password,
};
pub use settings::{FALLBACK_BUSINESS_NAME, ParseThemeError, SettingKey, Settings, Theme};
pub use whatsapp::{WhatsAppNumber, WhatsAppNumberError};
