//! Domain models for the store.
//!
//! Field names follow the existing JSON data files, so several structs carry
//! explicit `#[serde(rename)]` attributes instead of a blanket `rename_all`.

pub mod activity;
pub mod feedback;
pub mod order;
pub mod product;
pub mod user;

pub use activity::{ActivityLog, NewActivityLog};
pub use feedback::{Feedback, FeedbackRequest, ProductReviews, ReviewView};
pub use order::{
    LineItem, LineItemRequest, Order, OrderStats, PlaceOrderRequest, Quote, UpdateStatusRequest,
};
pub use product::{Product, ProductInput};
pub use user::{
    LoginRequest, QuestionsRequest, RegisterRequest, ResetPasswordRequest, RoleUpdateRequest,
    SecurityQuestions, User, UserView,
};
