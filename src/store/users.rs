//! PostgreSQL-backed user store.

use super::UserStore;
use crate::error::{conflict_on_unique, AppError};
use crate::model::{Avatar, NewUser, UserChanges, UserQuery, UserRecord};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, name, hashed_password, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        PgUserStore { pool }
    }
}

/// ILIKE pattern matching `needle` anywhere, with wildcards in the needle escaped.
fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, AppError> {
        let sql = format!(
            "INSERT INTO users (id, email, name, hashed_password) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );
        tracing::debug!(sql = %sql, email = %user.email, "query");
        sqlx::query_as::<_, UserRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.hashed_password)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "email"))
    }

    async fn list(&self, query: &UserQuery) -> Result<(Vec<UserRecord>, u64), AppError> {
        let pattern = query.email_contains.as_deref().map(contains_pattern);
        let filter = "($1::text IS NULL OR email ILIKE $1)";
        let sql = format!(
            "SELECT {} FROM users WHERE {} ORDER BY created_at, id LIMIT $2 OFFSET $3",
            USER_COLUMNS, filter
        );
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(&pattern)
            .bind(i64::from(query.page_size))
            .bind(query.offset() as i64)
            .fetch_all(&self.pool)
            .await?;
        let total: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM users WHERE {}", filter))
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;
        Ok((rows, total.0.max(0) as u64))
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<Option<UserRecord>, AppError> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }
        let sql = format!(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                name = CASE WHEN $3 THEN $4 ELSE name END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let (set_name, name) = match &changes.name {
            Some(name) => (true, name.clone()),
            None => (false, None),
        };
        sqlx::query_as::<_, UserRecord>(&sql)
            .bind(id)
            .bind(&changes.email)
            .bind(set_name)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "email"))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn put_avatar(&self, id: Uuid, avatar: Avatar) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_avatars (user_id, content_type, bytes, updated_at)
            SELECT $1, $2, $3, NOW()
            WHERE EXISTS (SELECT 1 FROM users WHERE id = $1)
            ON CONFLICT (user_id)
            DO UPDATE SET content_type = EXCLUDED.content_type, bytes = EXCLUDED.bytes, updated_at = NOW()
            "#,
        )
        .bind(id)
        .bind(&avatar.content_type)
        .bind(&avatar.bytes)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn avatar(&self, id: Uuid) -> Result<Option<Avatar>, AppError> {
        let row: Option<(String, Vec<u8>)> =
            sqlx::query_as("SELECT content_type, bytes FROM user_avatars WHERE user_id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(content_type, bytes)| Avatar { content_type, bytes }))
    }
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(contains_pattern("kim"), "%kim%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }
}
