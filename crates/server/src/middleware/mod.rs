//! HTTP middleware.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. CORS
//! 3. `TraceLayer` (request span with `request_id` field)
//! 4. Request ID (record id in span, Sentry scope and response header)

pub mod auth;
pub mod cors;
pub mod request_id;

pub use auth::{AuthRejection, RequireAdmin, RequireUser, USER_ID_HEADER};
pub use cors::cors_layer;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
