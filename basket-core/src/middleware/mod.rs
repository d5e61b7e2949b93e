//! HTTP middleware for Basket Core
//!
//! - `AuthUser` / `AdminUser` extractors (the access control gate)
//! - Security headers middleware
//! - Error response normalization
//! - Request id + HTTP metrics layer
//! - Trace span maker that redacts secrets

pub mod auth;
pub mod error_response;
pub mod metrics;
pub mod security_headers;
pub mod trace;

pub use auth::{AdminUser, AuthError, AuthUser};
pub use error_response::normalize_error_response;
pub use metrics::ObservabilityLayer;
pub use security_headers::security_headers_middleware;
pub use trace::SanitizedMakeSpan;
