//! Language entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the languages table.
#[derive(Debug, Clone, FromRow)]
pub struct LanguageEntity {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub native_name: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LanguageEntity> for domain::models::Language {
    fn from(entity: LanguageEntity) -> Self {
        Self {
            id: entity.id,
            code: entity.code,
            name: entity.name,
            native_name: entity.native_name,
            is_default: entity.is_default,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
