//! HTTP middleware applied around the API router.
//!
//! # Order (innermost first)
//!
//! 1. Body size limit
//! 2. Rate limiting (governor)
//! 3. Security headers
//! 4. CORS
//! 5. Panic recovery
//! 6. `TraceLayer`

pub mod rate_limit;
pub mod security_headers;

pub use rate_limit::rate_limiter;
pub use security_headers::with_security_headers;
