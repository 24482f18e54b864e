//! The module exposes the authenticated user.

use api_types::user::UserView;
use axum::{Extension, Json};
use engine::User;

/// The caller as resolved by the auth middleware.
pub async fn me(Extension(user): Extension<User>) -> Json<UserView> {
    Json(UserView {
        username: user.username,
        is_superuser: user.is_superuser,
    })
}
