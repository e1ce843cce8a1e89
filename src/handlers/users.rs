//! User handlers: CRUD, avatar upload/download, and the authenticated text probe.

use crate::error::{AppError, ErrorBody};
use crate::extractors::BearerToken;
use crate::model::{Avatar, AvatarUploaded, CreateUserInput, ListParams, PatchUserInput, ReplaceUserInput, User};
use crate::response::{success_one, success_one_ok, success_page, SuccessOne, SuccessPage};
use crate::service::UserService;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use utoipa::ToSchema;
use uuid::Uuid;

pub const USER_TEST_BODY: &str = "user-test ok";

/// Multipart form of `POST /users/{id}/avatar`. Documentation only.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct AvatarForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

fn parse_id(id_str: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id_str).map_err(|_| AppError::BadRequest("invalid uuid".into()))
}

/// Plain-text probe for frontend wiring; requires a bearer token.
#[utoipa::path(
    get,
    path = "/user-test",
    tag = "users",
    security(("access-token" = [])),
    responses(
        (status = 200, description = "Token accepted", body = String, content_type = "text/plain"),
        (status = 401, description = "Missing bearer token", body = ErrorBody)
    )
)]
pub async fn user_test(BearerToken(_token): BearerToken) -> &'static str {
    USER_TEST_BODY
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("access-token" = [])),
    params(ListParams),
    responses(
        (status = 200, description = "One page of users", body = SuccessPage<User>),
        (status = 401, description = "Missing bearer token", body = ErrorBody)
    )
)]
pub async fn list_users(
    _token: BearerToken,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let (users, meta) = UserService::list(state.users.as_ref(), &params).await?;
    Ok(success_page(users, meta))
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    security(("access-token" = [])),
    request_body = CreateUserInput,
    responses(
        (status = 201, description = "User created", body = SuccessOne<User>),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 422, description = "Invalid input", body = ErrorBody)
    )
)]
pub async fn create_user(
    _token: BearerToken,
    State(state): State<AppState>,
    Json(body): Json<CreateUserInput>,
) -> Result<impl IntoResponse, AppError> {
    let user = UserService::create(state.users.as_ref(), body).await?;
    Ok(success_one(user))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("access-token" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = SuccessOne<User>),
        (status = 404, description = "No such user", body = ErrorBody)
    )
)]
pub async fn get_user(
    _token: BearerToken,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let user = UserService::read(state.users.as_ref(), id).await?;
    Ok(success_one_ok(user))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    security(("access-token" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    request_body = ReplaceUserInput,
    responses(
        (status = 200, description = "User replaced", body = SuccessOne<User>),
        (status = 404, description = "No such user", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn replace_user(
    _token: BearerToken,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<ReplaceUserInput>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let user = UserService::update(state.users.as_ref(), id, body.into()).await?;
    Ok(success_one_ok(user))
}

#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    security(("access-token" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    request_body = PatchUserInput,
    responses(
        (status = 200, description = "User updated", body = SuccessOne<User>),
        (status = 404, description = "No such user", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn patch_user(
    _token: BearerToken,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<PatchUserInput>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let user = UserService::update(state.users.as_ref(), id, body.into()).await?;
    Ok(success_one_ok(user))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("access-token" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "No such user", body = ErrorBody)
    )
)]
pub async fn delete_user(
    _token: BearerToken,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    UserService::delete(state.users.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/users/{id}/avatar",
    tag = "users",
    security(("access-token" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    request_body(content = AvatarForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Avatar stored", body = SuccessOne<AvatarUploaded>),
        (status = 404, description = "No such user", body = ErrorBody),
        (status = 422, description = "Missing, empty or non-image file", body = ErrorBody)
    )
)]
pub async fn upload_avatar(
    _token: BearerToken,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let mut avatar: Option<Avatar> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("multipart: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("multipart: {}", e)))?;
        avatar = Some(Avatar {
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    let avatar = avatar.ok_or_else(|| AppError::Validation("file is required".into()))?;
    UserService::set_avatar(state.users.as_ref(), id, avatar).await?;
    Ok(success_one(AvatarUploaded {
        url: format!("/users/{}/avatar", id),
    }))
}

#[utoipa::path(
    get,
    path = "/users/{id}/avatar",
    tag = "users",
    security(("access-token" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Avatar image bytes"),
        (status = 404, description = "No avatar stored", body = ErrorBody)
    )
)]
pub async fn get_avatar(
    _token: BearerToken,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let avatar = UserService::avatar(state.users.as_ref(), id).await?;
    Ok(([(header::CONTENT_TYPE, avatar.content_type)], avatar.bytes))
}
