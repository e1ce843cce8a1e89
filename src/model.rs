//! Records stored in the database and the request/response shapes built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// A user as exposed over the API. Never carries the password hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full `users` row.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        User {
            id: r.id,
            email: r.email,
            name: r.name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Values for a new `users` row; the password is already hashed.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub hashed_password: String,
}

/// Column changes for an update. `None` leaves a column as is; `Some(None)` clears `name`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub name: Option<Option<String>>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Body of `PUT /users/:id`: every column is replaced.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceUserInput {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `PATCH /users/:id`: only present fields change; `"name": null` clears the name.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchUserInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
}

impl From<ReplaceUserInput> for UserChanges {
    fn from(input: ReplaceUserInput) -> Self {
        UserChanges {
            email: Some(input.email),
            name: Some(input.name),
        }
    }
}

impl From<PatchUserInput> for UserChanges {
    fn from(input: PatchUserInput) -> Self {
        UserChanges {
            email: input.email,
            name: input.name,
        }
    }
}

/// Distinguishes a field sent as `null` from a missing field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query of `GET /users`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number (default 1).
    pub page: Option<u32>,
    /// Rows per page (default 20, at most 100).
    pub page_size: Option<u32>,
    /// Case-insensitive email substring.
    pub q: Option<String>,
}

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Normalized paging window for a user listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserQuery {
    pub page: u32,
    pub page_size: u32,
    pub email_contains: Option<String>,
}

impl UserQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

impl From<&ListParams> for UserQuery {
    fn from(p: &ListParams) -> Self {
        UserQuery {
            page: p.page.unwrap_or(1).max(1),
            page_size: p.page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            email_contains: p
                .q
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

/// A page of results as handed to frontend code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Clone, Debug)]
pub struct Avatar {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AvatarUploaded {
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct CourseCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_distinguishes_null_from_missing() {
        let missing: PatchUserInput = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();
        assert_eq!(missing.name, None);
        let cleared: PatchUserInput = serde_json::from_str(r#"{"name":null}"#).unwrap();
        assert_eq!(cleared.name, Some(None));
        let set: PatchUserInput = serde_json::from_str(r#"{"name":"Kim"}"#).unwrap();
        assert_eq!(set.name, Some(Some("Kim".into())));
    }

    #[test]
    fn replace_sets_every_column() {
        let changes: UserChanges = ReplaceUserInput {
            email: "a@b.c".into(),
            name: None,
        }
        .into();
        assert_eq!(changes.email.as_deref(), Some("a@b.c"));
        assert_eq!(changes.name, Some(None));
    }

    #[test]
    fn list_params_normalize() {
        let q = UserQuery::from(&ListParams::default());
        assert_eq!((q.page, q.page_size, q.offset()), (1, 20, 0));

        let q = UserQuery::from(&ListParams {
            page: Some(0),
            page_size: Some(5000),
            q: Some("  ".into()),
        });
        assert_eq!((q.page, q.page_size), (1, MAX_PAGE_SIZE));
        assert_eq!(q.email_contains, None);

        let q = UserQuery::from(&ListParams {
            page: Some(3),
            page_size: Some(10),
            q: Some(" kim ".into()),
        });
        assert_eq!(q.offset(), 20);
        assert_eq!(q.email_contains.as_deref(), Some("kim"));
    }

    #[test]
    fn user_json_is_camel_case_without_hash() {
        let record = UserRecord {
            id: Uuid::nil(),
            email: "a@b.c".into(),
            name: None,
            hashed_password: "$2b$10$secret".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(User::from(record)).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("name").is_none());
        assert!(!json.to_string().contains("secret"));
    }
}
