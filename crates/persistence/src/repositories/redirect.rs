//! Redirect repository for database operations.

use domain::models::{NewRedirect, RedirectChanges};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::RedirectEntity;
use crate::metrics::QueryTimer;

const REDIRECT_COLUMNS: &str =
    "id, from_path, to_path, type, is_active, created_by, created_at, updated_at";

/// Repository for path redirects.
#[derive(Clone)]
pub struct RedirectRepository {
    pool: PgPool,
}

impl RedirectRepository {
    /// Creates a new RedirectRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List redirects, newest first.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<RedirectEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_redirects");
        let result = sqlx::query_as::<_, RedirectEntity>(&format!(
            "SELECT {} FROM redirects ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
            REDIRECT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_redirects");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM redirects")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Active redirects, newest first.
    pub async fn list_active(&self) -> Result<Vec<RedirectEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_redirects");
        let result = sqlx::query_as::<_, RedirectEntity>(&format!(
            "SELECT {} FROM redirects WHERE is_active = true ORDER BY created_at DESC, id",
            REDIRECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RedirectEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_redirect_by_id");
        let result = sqlx::query_as::<_, RedirectEntity>(&format!(
            "SELECT {} FROM redirects WHERE id = $1",
            REDIRECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The active redirect for a source path, if any.
    pub async fn find_active_by_path(
        &self,
        from_path: &str,
    ) -> Result<Option<RedirectEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_redirect_by_path");
        let result = sqlx::query_as::<_, RedirectEntity>(&format!(
            "SELECT {} FROM redirects WHERE from_path = $1 AND is_active = true",
            REDIRECT_COLUMNS
        ))
        .bind(from_path)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn insert(&self, redirect: &NewRedirect) -> Result<RedirectEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_redirect");
        let result = sqlx::query_as::<_, RedirectEntity>(&format!(
            r#"
            INSERT INTO redirects (from_path, to_path, type, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            REDIRECT_COLUMNS
        ))
        .bind(&redirect.from_path)
        .bind(&redirect.to_path)
        .bind(redirect.redirect_type.status_code())
        .bind(redirect.created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: &RedirectChanges,
    ) -> Result<Option<RedirectEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_redirect");
        let result = sqlx::query_as::<_, RedirectEntity>(&format!(
            r#"
            UPDATE redirects SET
                to_path = COALESCE($2, to_path),
                type = COALESCE($3, type),
                is_active = COALESCE($4, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            REDIRECT_COLUMNS
        ))
        .bind(id)
        .bind(&changes.to_path)
        .bind(changes.redirect_type.map(|t| t.status_code()))
        .bind(changes.is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_redirect");
        let result = sqlx::query("DELETE FROM redirects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
