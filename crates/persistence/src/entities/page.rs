//! Page entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the pages table.
#[derive(Debug, Clone, FromRow)]
pub struct PageEntity {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_published: bool,
    pub template: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PageEntity> for domain::models::Page {
    fn from(entity: PageEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            slug: entity.slug,
            title: entity.title,
            description: entity.description,
            is_published: entity.is_published,
            template: entity.template,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
