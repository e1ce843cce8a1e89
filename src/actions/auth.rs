//! Signup and credential checks, run server-side straight against the user store.

use crate::error::AppError;
use crate::model::{NewUser, User};
use crate::password::{compare_password_blocking, hash_password_blocking, MAX_PASSWORD_BYTES};
use crate::store::UserStore;
use serde::{Deserialize, Serialize};

pub const EMAIL_TAKEN_MESSAGE: &str = "an account with this email already exists";
pub const SIGN_UP_FAILED_MESSAGE: &str = "sign up failed";
pub const PASSWORD_TOO_LONG_MESSAGE: &str = "password must be at most 72 bytes";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Ok,
    Error,
}

/// Outcome of a server action, serialized as `{"status": "ok"}` or `{"status": "error", "message": ..}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub status: ActionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionResult {
    pub fn ok() -> Self {
        ActionResult {
            status: ActionStatus::Ok,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ActionResult {
            status: ActionStatus::Error,
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ActionStatus::Ok
    }
}

/// Register a user. Never fails: a taken email or any store/hash error becomes an error result.
pub async fn sign_up(users: &dyn UserStore, input: SignUpInput) -> ActionResult {
    match try_sign_up(users, input).await {
        Ok(result) => result,
        // Lost a race with a concurrent signup for the same email.
        Err(AppError::Conflict(_)) => ActionResult::error(EMAIL_TAKEN_MESSAGE),
        Err(e) => {
            tracing::warn!(error = %e, "sign up failed");
            ActionResult::error(SIGN_UP_FAILED_MESSAGE)
        }
    }
}

async fn try_sign_up(users: &dyn UserStore, input: SignUpInput) -> Result<ActionResult, AppError> {
    if users.find_by_email(&input.email).await?.is_some() {
        return Ok(ActionResult::error(EMAIL_TAKEN_MESSAGE));
    }
    if input.password.len() > MAX_PASSWORD_BYTES {
        return Ok(ActionResult::error(PASSWORD_TOO_LONG_MESSAGE));
    }
    let hashed_password = hash_password_blocking(input.password).await?;
    let user = users
        .insert(NewUser {
            email: input.email,
            name: None,
            hashed_password,
        })
        .await?;
    tracing::info!(user_id = %user.id, "signed up");
    Ok(ActionResult::ok())
}

/// Look up `email` and check `password` against the stored hash.
/// `Ok(None)` covers both an unknown email and a wrong password.
pub async fn authorize_credentials(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let Some(record) = users.find_by_email(email).await? else {
        return Ok(None);
    };
    if compare_password_blocking(password.to_string(), record.hashed_password.clone()).await {
        Ok(Some(record.into()))
    } else {
        Ok(None)
    }
}
