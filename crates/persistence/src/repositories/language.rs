//! Language repository for database operations.

use domain::models::{LanguageChanges, NewLanguage};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::LanguageEntity;
use crate::metrics::{timed, QueryTimer};

const LANGUAGE_COLUMNS: &str =
    "id, code, name, native_name, is_default, is_active, created_at, updated_at";

/// Repository for site languages.
#[derive(Clone)]
pub struct LanguageRepository {
    pool: PgPool,
}

impl LanguageRepository {
    /// Creates a new LanguageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List languages, default first.
    pub async fn list(&self) -> Result<Vec<LanguageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_languages");
        let result = sqlx::query_as::<_, LanguageEntity>(&format!(
            "SELECT {} FROM languages ORDER BY is_default DESC, code",
            LANGUAGE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<LanguageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_language_by_id");
        let result = sqlx::query_as::<_, LanguageEntity>(&format!(
            "SELECT {} FROM languages WHERE id = $1",
            LANGUAGE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<LanguageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_language_by_code");
        let result = sqlx::query_as::<_, LanguageEntity>(&format!(
            "SELECT {} FROM languages WHERE code = $1",
            LANGUAGE_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_default(&self) -> Result<Option<LanguageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_default_language");
        let result = sqlx::query_as::<_, LanguageEntity>(&format!(
            "SELECT {} FROM languages WHERE is_default = true LIMIT 1",
            LANGUAGE_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a language. A new default replaces the previous one atomically.
    pub async fn create(&self, language: &NewLanguage) -> Result<LanguageEntity, sqlx::Error> {
        timed("create_language", self.create_tx(language)).await
    }

    async fn create_tx(&self, language: &NewLanguage) -> Result<LanguageEntity, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        if language.is_default {
            sqlx::query(
                "UPDATE languages SET is_default = false, updated_at = NOW() WHERE is_default = true",
            )
            .execute(&mut *tx)
            .await?;
        }

        let created = sqlx::query_as::<_, LanguageEntity>(&format!(
            r#"
            INSERT INTO languages (code, name, native_name, is_default, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            LANGUAGE_COLUMNS
        ))
        .bind(&language.code)
        .bind(&language.name)
        .bind(&language.native_name)
        .bind(language.is_default)
        .bind(language.is_active)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Apply partial changes. Promoting to default clears the previous default
    /// in the same transaction.
    pub async fn update(
        &self,
        id: Uuid,
        changes: &LanguageChanges,
    ) -> Result<Option<LanguageEntity>, sqlx::Error> {
        timed("update_language", self.update_tx(id, changes)).await
    }

    async fn update_tx(
        &self,
        id: Uuid,
        changes: &LanguageChanges,
    ) -> Result<Option<LanguageEntity>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        if changes.is_default == Some(true) {
            sqlx::query(
                r#"
                UPDATE languages SET is_default = false, updated_at = NOW()
                WHERE is_default = true AND id <> $1
                "#,
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        let updated = sqlx::query_as::<_, LanguageEntity>(&format!(
            r#"
            UPDATE languages SET
                name = COALESCE($2, name),
                native_name = COALESCE($3, native_name),
                is_default = COALESCE($4, is_default),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            LANGUAGE_COLUMNS
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.native_name)
        .bind(changes.is_default)
        .bind(changes.is_active)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            tx.rollback().await?;
        } else {
            tx.commit().await?;
        }
        Ok(updated)
    }

    /// Delete a language. Its translations go with it (ON DELETE CASCADE).
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_language");
        let result = sqlx::query("DELETE FROM languages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
