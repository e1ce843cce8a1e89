//! Course category handlers. Public, read-only.

use crate::error::{AppError, ErrorBody};
use crate::model::CourseCategory;
use crate::response::{success_many, success_one_ok, SuccessMany, SuccessOne};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

#[utoipa::path(
    get,
    path = "/course-categories",
    tag = "categories",
    responses((status = 200, description = "All categories by name", body = SuccessMany<CourseCategory>))
)]
pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = state.categories.list().await?;
    Ok(success_many(rows))
}

#[utoipa::path(
    get,
    path = "/course-categories/{slug}",
    tag = "categories",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Category", body = SuccessOne<CourseCategory>),
        (status = 404, description = "No such category", body = ErrorBody)
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let category = state
        .categories
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {}", slug)))?;
    Ok(success_one_ok(category))
}
