//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::UrlMapping;
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;

/// PostgreSQL repository for the `tiny_urls` table.
///
/// Lookups by long URL go through the unique `md5(long_url)` index; the plain
/// equality check guards against digest collisions.
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct MappingRow {
    short_url: String,
    long_url: String,
    created_at: DateTime<Utc>,
    click_count: i64,
}

impl From<MappingRow> for UrlMapping {
    fn from(row: MappingRow) -> Self {
        UrlMapping::new(row.short_url, row.long_url, row.created_at, row.click_count)
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn find_short_code_by_long_url(
        &self,
        long_url: &str,
    ) -> Result<Option<String>, AppError> {
        let code = sqlx::query_scalar::<_, String>(
            r#"
            SELECT short_url
            FROM tiny_urls
            WHERE md5(long_url) = md5($1) AND long_url = $1
            "#,
        )
        .bind(long_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(code)
    }

    async fn insert_if_absent(&self, short_code: &str, long_url: &str) -> Result<bool, AppError> {
        // Conflicts on either the primary key or the long URL index are a no-op.
        let result = sqlx::query(
            r#"
            INSERT INTO tiny_urls (short_url, long_url)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(short_code)
        .bind(long_url)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn increment_and_fetch(&self, short_code: &str) -> Result<Option<String>, AppError> {
        let long_url = sqlx::query_scalar::<_, String>(
            r#"
            UPDATE tiny_urls
            SET click_count = click_count + 1
            WHERE short_url = $1
            RETURNING long_url
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(long_url)
    }

    async fn apply_batched_increment(
        &self,
        short_code: &str,
        delta: i64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE tiny_urls
            SET click_count = click_count + $2
            WHERE short_url = $1
            "#,
        )
        .bind(short_code)
        .bind(delta)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT short_url, long_url, created_at, click_count
            FROM tiny_urls
            WHERE short_url = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlMapping::from))
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
