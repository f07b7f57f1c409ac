//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                         - Liveness check
//!
//! # Auth
//! POST   /api/auth/register              - Create account (201)
//! POST   /api/auth/login                 - Check credentials
//!
//! # Catalog & checkout
//! GET    /api/products                   - Product listing
//! GET    /api/products/{id}              - Product detail
//! POST   /api/checkout                   - Price a cart (no reservation)
//! POST   /api/orders                     - Place order (201)
//! GET    /api/orders?userId=             - Order history
//!
//! # Account
//! GET    /api/profile                    - Caller's account (X-User-ID)
//! POST   /api/password-reset/questions   - Recovery questions for an email
//! POST   /api/password-reset/reset       - Reset with recovery answers
//!
//! # Feedback
//! GET    /api/feedback?productId=        - Reviews and average rating
//! POST   /api/feedback                   - Submit a purchase-verified review
//!
//! # Admin (X-User-ID must be an admin)
//! GET    /api/admin/stats                - Dashboard counters
//! GET    /api/admin/products             - Product listing
//! POST   /api/admin/products             - Create product
//! PUT    /api/admin/products/{id}        - Partial update
//! DELETE /api/admin/products/{id}        - Delete (204)
//! GET    /api/admin/users                - Accounts without credentials
//! PUT    /api/admin/role/{id}            - Change role
//! GET    /api/admin/orders               - All orders
//! PUT    /api/admin/orders/status        - Change order status
//! GET    /api/admin/logs                 - Activity log
//! POST   /api/admin/logs                 - Append activity entry
//! DELETE /api/admin/logs                 - Clear activity log
//! GET    /api/admin/feedback             - All reviews
//! DELETE /api/admin/feedback/{id}        - Delete review (204)
//!
//! GET    /*                              - Static files, index.html at /
//! ```

pub mod admin;
pub mod auth;
pub mod extract;
pub mod feedback;
pub mod orders;
pub mod password_reset;
pub mod products;
pub mod profile;

use axum::{
    Router,
    extract::Request,
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{cors_layer, request_id_middleware};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Create the password recovery routes router.
pub fn password_reset_routes() -> Router<AppState> {
    Router::new()
        .route("/questions", post(password_reset::questions))
        .route("/reset", post(password_reset::reset))
}

/// Create the admin console routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::stats))
        .route(
            "/products",
            get(admin::list_products).post(admin::create_product),
        )
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/users", get(admin::list_users))
        .route("/role/{id}", put(admin::update_role))
        .route("/orders", get(admin::list_orders))
        .route("/orders/status", put(admin::update_order_status))
        .route(
            "/logs",
            get(admin::list_logs)
                .post(admin::add_log)
                .delete(admin::clear_logs),
        )
        .route("/feedback", get(admin::list_feedback))
        .route("/feedback/{id}", delete(admin::delete_feedback))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes())
        .route("/api/products", get(products::index))
        .route("/api/products/{id}", get(products::show))
        .route("/api/checkout", post(orders::checkout))
        .route("/api/orders", get(orders::history).post(orders::place))
        .route("/api/profile", get(profile::show))
        .route(
            "/api/feedback",
            get(feedback::index).post(feedback::submit),
        )
        .nest("/api/password-reset", password_reset_routes())
        .nest("/api/admin", admin_routes())
}

/// The complete application: API routes, static files and middleware.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config().static_dir);

    routes()
        .fallback_service(static_files)
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .layer(cors_layer())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the data files.
async fn health() -> &'static str {
    "ok"
}
