//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Shared-password authentication backed by `site_settings`

pub mod auth;

pub use auth::{
    AdminAuthStore, AuthPersistence, AuthPersistenceError, CredentialState,
    MemoryAuthPersistence, PasswordChangeError,
};
