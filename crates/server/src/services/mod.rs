//! Business logic services.
//!
//! Services are cheap borrowing wrappers constructed per request from
//! [`crate::db::Database`].
//!
//! # Services
//!
//! - `activity` - Admin activity trail
//! - `auth` - Registration, login, roles, password recovery
//! - `feedback` - Purchase-verified product reviews
//! - `orders` - Quoting, placement with stock reservation, status changes
//! - `products` - Catalog administration

pub mod activity;
pub mod auth;
pub mod feedback;
pub mod orders;
pub mod products;

pub use activity::ActivityService;
pub use auth::{AuthError, AuthService};
pub use feedback::{FeedbackError, FeedbackService};
pub use orders::{OrderError, OrderService};
pub use products::{ProductError, ProductService};
