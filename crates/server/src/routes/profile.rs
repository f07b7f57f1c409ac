//! Profile handler.

use axum::Json;

use crate::middleware::RequireUser;
use crate::models::UserView;

/// The caller's own account, without credentials.
pub async fn show(RequireUser(user): RequireUser) -> Json<UserView> {
    Json(UserView::from(user))
}
