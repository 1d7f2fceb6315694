//! Domain models for admin.

pub mod session;

pub use session::{AuthSession, keys as session_keys};
