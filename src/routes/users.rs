//! User routes. Every route requires a bearer token.

use crate::handlers::users::{
    create_user, delete_user, get_avatar, get_user, list_users, patch_user, replace_user, upload_avatar, user_test,
};
use crate::service::MAX_AVATAR_BYTES;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::limit::RequestBodyLimitLayer;

/// Room for multipart boundaries and part headers around the file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn user_routes(state: AppState) -> Router {
    let avatar = Router::new()
        .route("/users/:id/avatar", get(get_avatar).post(upload_avatar))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_AVATAR_BYTES + MULTIPART_OVERHEAD));

    Router::new()
        .route("/user-test", get(user_test))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(replace_user).patch(patch_user).delete(delete_user),
        )
        .merge(avatar)
        .with_state(state)
}
