//! Component catalog entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{ComponentDefinition, ComponentType};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the components table.
#[derive(Debug, Clone, FromRow)]
pub struct ComponentEntity {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    pub component_type: String,
    pub name: String,
    pub description: Option<String>,
    pub default_props: serde_json::Value,
    pub schema: Option<serde_json::Value>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ComponentEntity> for ComponentDefinition {
    type Error = String;

    fn try_from(entity: ComponentEntity) -> Result<Self, Self::Error> {
        let component_type: ComponentType = entity.component_type.parse()?;
        Ok(Self {
            id: entity.id,
            component_type,
            name: entity.name,
            description: entity.description,
            default_props: entity.default_props,
            schema: entity.schema,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entity(component_type: &str) -> ComponentEntity {
        ComponentEntity {
            id: Uuid::new_v4(),
            component_type: component_type.to_string(),
            name: "Hero Section".to_string(),
            description: None,
            default_props: serde_json::json!({"title": "Welcome"}),
            schema: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_known_type_converts() {
        let definition = ComponentDefinition::try_from(entity("hero")).unwrap();
        assert_eq!(definition.component_type, ComponentType::Hero);
        assert_eq!(definition.default_props["title"], "Welcome");
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(ComponentDefinition::try_from(entity("carousel")).is_err());
    }
}
