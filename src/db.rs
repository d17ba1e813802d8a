use crate::error::{AppError, AppResult};
use crate::models::{NewShortLink, ShortLink};
use crate::store::LinkStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    ConnectOptions, PgPool,
};
use std::str::FromStr;
use std::time::Duration;

const LINK_COLUMNS: &str = "id, short_code, original_url, created_at, expires_at, deleted_at";

/// Postgres-backed short link repository
#[derive(Clone)]
pub struct Repository {
    pool: PgPool,
}

impl Repository {
    /// Create a new repository with a connection pool
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_seconds: u64,
    ) -> AppResult<Self> {
        let options = PgConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Configuration(format!("Invalid database URL: {}", e)))?
            .disable_statement_logging();

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_seconds))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// The partial unique index on `short_code` is what arbitrates concurrent inserts.
fn map_insert_error(err: sqlx::Error, short_code: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::SlugConflict(short_code.to_string())
        }
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl LinkStore for Repository {
    async fn insert(&self, link: NewShortLink) -> AppResult<ShortLink> {
        let query = format!(
            r#"
            INSERT INTO short_links (short_code, original_url, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {LINK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, ShortLink>(&query)
            .bind(&link.short_code)
            .bind(&link.original_url)
            .bind(link.created_at)
            .bind(link.expires_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, &link.short_code))
    }

    async fn find_by_code(&self, short_code: &str) -> AppResult<Option<ShortLink>> {
        let query = format!(
            r#"
            SELECT {LINK_COLUMNS} FROM short_links
            WHERE short_code = $1 AND deleted_at IS NULL
            "#
        );

        let result = sqlx::query_as::<_, ShortLink>(&query)
            .bind(short_code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    async fn soft_delete(&self, link: &ShortLink) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE short_links
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(link.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_expiration(
        &self,
        link: &ShortLink,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Option<ShortLink>> {
        let query = format!(
            r#"
            UPDATE short_links
            SET expires_at = $1
            WHERE id = $2 AND deleted_at IS NULL
            RETURNING {LINK_COLUMNS}
            "#
        );

        let result = sqlx::query_as::<_, ShortLink>(&query)
            .bind(expires_at)
            .bind(link.id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM short_links
            WHERE deleted_at IS NOT NULL OR expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_unique_errors_stay_database_errors() {
        let err = map_insert_error(sqlx::Error::RowNotFound, "abc123");
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_link_columns_cover_model() {
        for column in ["id", "short_code", "original_url", "created_at", "expires_at", "deleted_at"] {
            assert!(LINK_COLUMNS.contains(column));
        }
    }
}
