//! Redirect entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Redirect, RedirectType};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the redirects table.
#[derive(Debug, Clone, FromRow)]
pub struct RedirectEntity {
    pub id: Uuid,
    pub from_path: String,
    pub to_path: String,
    #[sqlx(rename = "type")]
    pub redirect_type: i32,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RedirectEntity> for Redirect {
    type Error = String;

    fn try_from(entity: RedirectEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            from_path: entity.from_path,
            to_path: entity.to_path,
            redirect_type: RedirectType::try_from(entity.redirect_type)?,
            is_active: entity.is_active,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}
