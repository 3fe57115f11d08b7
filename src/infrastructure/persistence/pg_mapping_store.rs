//! PostgreSQL implementation of the mapping store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::domain::entities::UrlMapping;
use crate::domain::repositories::{MappingStore, StoreError};

/// PostgreSQL repository for URL mappings.
///
/// Rows live in `url_mappings`, keyed by `short_code`. All statements are
/// parameterized; the pool is shared process-wide.
pub struct PgMappingStore {
    pool: Arc<PgPool>,
}

impl PgMappingStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct MappingRow {
    short_code: String,
    original_url: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    hit_count: i64,
}

impl From<MappingRow> for UrlMapping {
    fn from(row: MappingRow) -> Self {
        Self {
            short_code: row.short_code,
            original_url: row.original_url,
            created_at: row.created_at,
            expires_at: row.expires_at,
            hit_count: u64::try_from(row.hit_count).unwrap_or(0),
        }
    }
}

/// Maps a SQLx error to a store error, recognizing primary-key conflicts.
fn map_sqlx_error(e: sqlx::Error, short_code: &str) -> StoreError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return StoreError::DuplicateCode(short_code.to_string());
    }

    error!("Database error for {}: {}", short_code, e);
    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl MappingStore for PgMappingStore {
    async fn put(&self, mapping: &UrlMapping) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO url_mappings (short_code, original_url, created_at, expires_at, hit_count)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&mapping.short_code)
        .bind(&mapping.original_url)
        .bind(mapping.created_at)
        .bind(mapping.expires_at)
        .bind(i64::try_from(mapping.hit_count).unwrap_or(i64::MAX))
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error(e, &mapping.short_code))?;

        Ok(())
    }

    async fn get(&self, short_code: &str) -> Result<Option<UrlMapping>, StoreError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT short_code, original_url, created_at, expires_at, hit_count
            FROM url_mappings
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| map_sqlx_error(e, short_code))?;

        Ok(row.map(UrlMapping::from))
    }

    async fn delete(&self, short_code: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM url_mappings WHERE short_code = $1")
            .bind(short_code)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| map_sqlx_error(e, short_code))?;

        Ok(())
    }

    async fn increment_hit_count(&self, short_code: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE url_mappings SET hit_count = hit_count + 1 WHERE short_code = $1")
            .bind(short_code)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| map_sqlx_error(e, short_code))?;

        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
