//! HTTP middleware stack for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (no framing, no caching, strict CSP)
//! 5. Session layer (tower-sessions with `PostgreSQL` store)
//! 6. Rate limiting on login submissions (governor)
//! 7. Admin gate (`RequireAdmin` extractor on protected routes)

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{AdminAuthRejection, Gate, RequireAdmin, SessionGate};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
