//! Read-only access to published products and posts.

use domain::models::EntityType;
use sqlx::PgPool;

use crate::entities::LocalizableEntity;
use crate::metrics::QueryTimer;

/// Table backing a catalog entity type. Pages and page components are not
/// served through this repository.
fn table_for(entity_type: EntityType) -> Option<&'static str> {
    match entity_type {
        EntityType::Product => Some("products"),
        EntityType::Post => Some("posts"),
        EntityType::Page | EntityType::PageComponent => None,
    }
}

/// Repository for published catalog records.
#[derive(Clone)]
pub struct LocalizableRepository {
    pool: PgPool,
}

impl LocalizableRepository {
    /// Creates a new LocalizableRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a published record by slug.
    pub async fn find_published(
        &self,
        entity_type: EntityType,
        slug: &str,
    ) -> Result<Option<LocalizableEntity>, sqlx::Error> {
        let Some(table) = table_for(entity_type) else {
            return Ok(None);
        };
        let timer = QueryTimer::new(format!("find_published_{}", entity_type));
        let result = sqlx::query_as::<_, LocalizableEntity>(&format!(
            r#"
            SELECT t.id, t.slug, to_jsonb(t.*) - 'id' - 'slug' - 'is_published' AS fields
            FROM {} t
            WHERE t.slug = $1 AND t.is_published = true
            "#,
            table
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Published records, newest first.
    pub async fn list_published(
        &self,
        entity_type: EntityType,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LocalizableEntity>, sqlx::Error> {
        let Some(table) = table_for(entity_type) else {
            return Ok(Vec::new());
        };
        let timer = QueryTimer::new(format!("list_published_{}", entity_type));
        let result = sqlx::query_as::<_, LocalizableEntity>(&format!(
            r#"
            SELECT t.id, t.slug, to_jsonb(t.*) - 'id' - 'slug' - 'is_published' AS fields
            FROM {} t
            WHERE t.is_published = true
            ORDER BY t.created_at DESC, t.id
            LIMIT $1 OFFSET $2
            "#,
            table
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count_published(&self, entity_type: EntityType) -> Result<i64, sqlx::Error> {
        let Some(table) = table_for(entity_type) else {
            return Ok(0);
        };
        let timer = QueryTimer::new(format!("count_published_{}", entity_type));
        let result = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE is_published = true",
            table
        ))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
