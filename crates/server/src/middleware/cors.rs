//! Cross-origin policy for the browser client.

use axum::http::{HeaderName, Method, header};
use tower_http::cors::{Any, CorsLayer};

use super::auth::USER_ID_HEADER;

/// Any origin; the methods and headers the client uses.
#[must_use]
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)])
}
