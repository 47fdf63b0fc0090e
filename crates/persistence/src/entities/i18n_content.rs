//! Translation entities (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{EntityType, I18nEntry};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of i18n_content joined with its language code.
#[derive(Debug, Clone, FromRow)]
pub struct I18nContentEntity {
    pub id: Uuid,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub language_id: Uuid,
    pub language_code: String,
    pub field_name: String,
    pub field_value: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<I18nContentEntity> for I18nEntry {
    type Error = String;

    fn try_from(entity: I18nContentEntity) -> Result<Self, Self::Error> {
        let entity_type: EntityType = entity.entity_type.parse()?;
        Ok(Self {
            id: entity.id,
            entity_type,
            entity_id: entity.entity_id,
            language_id: entity.language_id,
            language_code: entity.language_code,
            field_name: entity.field_name,
            field_value: entity.field_value,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

/// Single translated field, as read by the batched lookup.
#[derive(Debug, Clone, FromRow)]
pub struct TranslatedFieldEntity {
    pub entity_id: Uuid,
    pub field_name: String,
    pub field_value: serde_json::Value,
}
