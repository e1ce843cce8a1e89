//! PostgreSQL-backed course category store.

use super::CategoryStore;
use crate::error::{conflict_on_unique, AppError};
use crate::model::{CourseCategory, NewCategory};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        PgCategoryStore { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn list(&self) -> Result<Vec<CourseCategory>, AppError> {
        let rows = sqlx::query_as::<_, CourseCategory>(
            "SELECT id, name, slug, description FROM course_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CourseCategory>, AppError> {
        let row = sqlx::query_as::<_, CourseCategory>(
            "SELECT id, name, slug, description FROM course_categories WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn replace_all(&self, categories: &[NewCategory]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM course_categories")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tracing::debug!(deleted, "cleared course_categories");
        let mut inserted = 0;
        for c in categories {
            inserted += sqlx::query(
                "INSERT INTO course_categories (id, name, slug, description) VALUES ($1, $2, $3, $4)",
            )
            .bind(Uuid::new_v4())
            .bind(&c.name)
            .bind(&c.slug)
            .bind(&c.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, "slug"))?
            .rows_affected();
        }
        tx.commit().await?;
        Ok(inserted)
    }
}
