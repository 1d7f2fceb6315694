//! Cookshop Core - Shared types library.
//!
//! This crate provides common types used across all Cookshop components:
//! - `storefront` - Public-facing shop with the cart and WhatsApp checkout
//! - `admin` - Password-gated administration panel
//! - `cli` - Command-line tools for migrations and settings
//!
//! # Architecture
//!
//! The core crate contains types, invariants and the remote settings store
//! contract. The only I/O lives behind the `postgres` feature, which provides
//! the `site_settings` adapter shared by every binary.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, money, the cart ledger, settings and password policy
//! - [`store`] - The key-value settings store contract and its implementations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod store;
pub mod types;

pub use store::{MemorySettingsStore, SettingRow, SettingsStore, StoreError};
pub use types::*;
