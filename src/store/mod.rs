//! Table DDL and the storage traits handlers and actions are written against.

mod categories;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
mod users;

pub use categories::PgCategoryStore;
pub use users::PgUserStore;

use crate::error::{AppError, ConfigError};
use crate::model::{Avatar, CourseCategory, NewCategory, NewUser, UserChanges, UserQuery, UserRecord};
use async_trait::async_trait;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;
use url::Url;
use uuid::Uuid;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Round-trip to the backing store; used by readiness checks.
    async fn ping(&self) -> Result<(), AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AppError>;
    /// Insert a user. Fails with `Conflict` when the email is taken.
    async fn insert(&self, user: NewUser) -> Result<UserRecord, AppError>;
    /// One page of users ordered by creation time, plus the total matching count.
    async fn list(&self, query: &UserQuery) -> Result<(Vec<UserRecord>, u64), AppError>;
    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<Option<UserRecord>, AppError>;
    /// Returns false when no such user exists.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
    /// Store (or replace) the avatar. Returns false when no such user exists.
    async fn put_avatar(&self, id: Uuid, avatar: Avatar) -> Result<bool, AppError>;
    async fn avatar(&self, id: Uuid) -> Result<Option<Avatar>, AppError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list(&self) -> Result<Vec<CourseCategory>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<CourseCategory>, AppError>;
    /// Delete every category and insert `categories` in one transaction. Returns rows inserted.
    async fn replace_all(&self, categories: &[NewCategory]) -> Result<u64, AppError>;
}

/// Create the application tables if missing. Safe to run on every start.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT,
            hashed_password TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_avatars (
            user_id UUID PRIMARY KEY REFERENCES users (id) ON DELETE CASCADE,
            content_type TEXT NOT NULL,
            bytes BYTEA NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS course_categories (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the database named in `database_url` when it does not exist yet, via the `postgres` admin database.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split `postgres://host/db?opts` into (`postgres://host/postgres?opts`, `db`).
fn parse_db_name_from_url(database_url: &str) -> Result<(String, String), AppError> {
    let mut url = Url::parse(database_url).map_err(|e| ConfigError::Invalid {
        key: "DATABASE_URL",
        reason: e.to_string(),
    })?;
    let db_name = url.path().trim_start_matches('/').trim().to_string();
    url.set_path("/postgres");
    Ok((url.into(), db_name))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_name_is_split_from_url() {
        let (admin, name) = parse_db_name_from_url("postgres://u:p@localhost:5432/course_market?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(name, "course_market");
    }

    #[test]
    fn url_without_database_has_empty_name() {
        let (admin, name) = parse_db_name_from_url("postgres://localhost").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres");
        assert_eq!(name, "");
    }

    #[test]
    fn slashes_in_query_do_not_move_the_database_name() {
        let (admin, name) =
            parse_db_name_from_url("postgres://u:p@h:5432/app?sslrootcert=/etc/ssl/ca.pem").unwrap();
        assert_eq!(name, "app");
        assert_eq!(admin, "postgres://u:p@h:5432/postgres?sslrootcert=/etc/ssl/ca.pem");
    }

    #[test]
    fn unparseable_url_is_a_config_error() {
        assert!(matches!(
            parse_db_name_from_url("not a url"),
            Err(AppError::Config(ConfigError::Invalid { key: "DATABASE_URL", .. }))
        ));
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("course_market"), "\"course_market\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
