//! User operations shared by the HTTP handlers.

use crate::error::AppError;
use crate::model::{Avatar, CreateUserInput, ListParams, NewUser, User, UserChanges, UserQuery};
use crate::password::hash_password_blocking;
use crate::response::PageMeta;
use crate::service::RequestValidator;
use crate::store::UserStore;
use uuid::Uuid;

/// Largest accepted avatar upload.
pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

pub struct UserService;

impl UserService {
    pub async fn list(users: &dyn UserStore, params: &ListParams) -> Result<(Vec<User>, PageMeta), AppError> {
        let query = UserQuery::from(params);
        let (rows, total) = users.list(&query).await?;
        let meta = PageMeta {
            total,
            page: query.page,
            page_size: query.page_size,
        };
        Ok((rows.into_iter().map(User::from).collect(), meta))
    }

    pub async fn read(users: &dyn UserStore, id: Uuid) -> Result<User, AppError> {
        users
            .find_by_id(id)
            .await?
            .map(User::from)
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    /// Validate, hash the password and insert. Duplicate emails are a `Conflict`.
    pub async fn create(users: &dyn UserStore, input: CreateUserInput) -> Result<User, AppError> {
        RequestValidator::validate_create(&input)?;
        if users.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("email already exists".into()));
        }
        let hashed_password = hash_password_blocking(input.password).await?;
        let record = users
            .insert(NewUser {
                email: input.email,
                name: input.name,
                hashed_password,
            })
            .await?;
        tracing::info!(user_id = %record.id, "user created");
        Ok(record.into())
    }

    pub async fn update(users: &dyn UserStore, id: Uuid, changes: UserChanges) -> Result<User, AppError> {
        RequestValidator::validate_partial(&changes)?;
        users
            .update(id, &changes)
            .await?
            .map(User::from)
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    pub async fn delete(users: &dyn UserStore, id: Uuid) -> Result<(), AppError> {
        if !users.delete(id).await? {
            return Err(AppError::NotFound(format!("user {}", id)));
        }
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }

    pub async fn set_avatar(users: &dyn UserStore, id: Uuid, avatar: Avatar) -> Result<(), AppError> {
        if avatar.bytes.is_empty() {
            return Err(AppError::Validation("file must not be empty".into()));
        }
        if avatar.bytes.len() > MAX_AVATAR_BYTES {
            return Err(AppError::Validation(format!(
                "file must be at most {} bytes",
                MAX_AVATAR_BYTES
            )));
        }
        if !avatar.content_type.starts_with("image/") {
            return Err(AppError::Validation("file must be an image".into()));
        }
        if !users.put_avatar(id, avatar).await? {
            return Err(AppError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }

    pub async fn avatar(users: &dyn UserStore, id: Uuid) -> Result<Avatar, AppError> {
        users
            .avatar(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("avatar for user {}", id)))
    }
}
