//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Client-owned cart ledger with synchronous persistence
//! - `checkout` - WhatsApp order message and deep link composer
//! - `settings` - Public site settings reader

pub mod cart;
pub mod checkout;
pub mod settings;

pub use cart::{CartStorage, CartStorageError, CartStore, MemoryCartStorage, SessionCartStorage};
pub use checkout::{CheckoutMessage, compose};
pub use settings::SettingsReader;
