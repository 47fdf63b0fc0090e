//! Published catalog record (products, posts) read as a field map.

use domain::models::{CanonicalEntity, FieldMap};
use sqlx::FromRow;
use uuid::Uuid;

/// A row whose columns other than id and slug are folded into `fields`.
#[derive(Debug, Clone, FromRow)]
pub struct LocalizableEntity {
    pub id: Uuid,
    pub slug: String,
    pub fields: serde_json::Value,
}

impl From<LocalizableEntity> for CanonicalEntity {
    fn from(entity: LocalizableEntity) -> Self {
        let fields = match entity.fields {
            serde_json::Value::Object(map) => map,
            _ => FieldMap::new(),
        };
        Self {
            id: entity.id,
            slug: entity.slug,
            fields,
        }
    }
}
