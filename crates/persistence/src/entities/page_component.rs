//! Page component entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{ComponentProps, ComponentSummary, ComponentType, PageComponent};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of page_components joined with its catalog definition.
#[derive(Debug, Clone, FromRow)]
pub struct PageComponentEntity {
    pub id: Uuid,
    pub page_id: Uuid,
    pub component_id: Uuid,
    pub component_type: Option<String>,
    pub component_name: Option<String>,
    pub props: serde_json::Value,
    pub sort_order: i32,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PageComponentEntity> for PageComponent {
    fn from(entity: PageComponentEntity) -> Self {
        let component_type: Option<ComponentType> = entity
            .component_type
            .as_deref()
            .and_then(|t| t.parse().ok());
        let component = match (component_type, entity.component_name) {
            (Some(component_type), Some(name)) => Some(ComponentSummary {
                id: entity.component_id,
                component_type,
                name,
            }),
            _ => None,
        };

        Self {
            id: entity.id,
            page_id: entity.page_id,
            component_id: entity.component_id,
            component,
            props: ComponentProps::decode(component_type, entity.props),
            sort_order: entity.sort_order,
            is_visible: entity.is_visible,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
