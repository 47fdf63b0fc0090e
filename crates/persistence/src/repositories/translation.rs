//! Translation repository for database operations.

use domain::models::{EntityType, NewTranslation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{I18nContentEntity, TranslatedFieldEntity};
use crate::metrics::QueryTimer;

/// Repository for per-field translations stored in i18n_content.
#[derive(Clone)]
pub struct TranslationRepository {
    pool: PgPool,
}

impl TranslationRepository {
    /// Creates a new TranslationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Translated fields of many entities in one active language.
    pub async fn fields_for(
        &self,
        entity_type: EntityType,
        entity_ids: &[Uuid],
        language_code: &str,
    ) -> Result<Vec<TranslatedFieldEntity>, sqlx::Error> {
        let timer = QueryTimer::new("translations_for");
        let result = sqlx::query_as::<_, TranslatedFieldEntity>(
            r#"
            SELECT t.entity_id, t.field_name, t.field_value
            FROM i18n_content t
            JOIN languages l ON l.id = t.language_id
            WHERE t.entity_type = $1
              AND t.entity_id = ANY($2)
              AND l.code = $3
              AND l.is_active = true
            "#,
        )
        .bind(entity_type.to_string())
        .bind(entity_ids)
        .bind(language_code)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert or replace a translated field.
    pub async fn upsert(
        &self,
        translation: &NewTranslation,
    ) -> Result<I18nContentEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_translation");
        let result = sqlx::query_as::<_, I18nContentEntity>(
            r#"
            WITH t AS (
                INSERT INTO i18n_content (entity_type, entity_id, language_id, field_name, field_value)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (entity_type, entity_id, language_id, field_name)
                DO UPDATE SET field_value = EXCLUDED.field_value, updated_at = NOW()
                RETURNING *
            )
            SELECT t.id, t.entity_type, t.entity_id, t.language_id, l.code AS language_code,
                   t.field_name, t.field_value, t.created_at, t.updated_at
            FROM t
            JOIN languages l ON l.id = t.language_id
            "#,
        )
        .bind(translation.entity_type.to_string())
        .bind(translation.entity_id)
        .bind(translation.language_id)
        .bind(&translation.field_name)
        .bind(&translation.field_value)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Translations of one entity, optionally limited to a language.
    pub async fn list_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
        language_code: Option<&str>,
    ) -> Result<Vec<I18nContentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_translations");
        let result = sqlx::query_as::<_, I18nContentEntity>(
            r#"
            SELECT t.id, t.entity_type, t.entity_id, t.language_id, l.code AS language_code,
                   t.field_name, t.field_value, t.created_at, t.updated_at
            FROM i18n_content t
            JOIN languages l ON l.id = t.language_id
            WHERE t.entity_type = $1
              AND t.entity_id = $2
              AND ($3::text IS NULL OR l.code = $3)
            ORDER BY l.code, t.field_name
            "#,
        )
        .bind(entity_type.to_string())
        .bind(entity_id)
        .bind(language_code)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_translation");
        let result = sqlx::query("DELETE FROM i18n_content WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
