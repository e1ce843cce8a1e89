//! Course category routes (public).

use crate::handlers::categories::{get_category, list_categories};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn category_routes(state: AppState) -> Router {
    Router::new()
        .route("/course-categories", get(list_categories))
        .route("/course-categories/:slug", get(get_category))
        .with_state(state)
}
