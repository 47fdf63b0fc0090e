//! Components placed on a page and the reorder payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::component::{ComponentProps, ComponentType};

/// Catalog data joined onto a placed component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub name: String,
}

/// A component instance on a page.
///
/// Per page, `sort_order` values are unique; display order is ascending.
/// Gaps are allowed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PageComponent {
    pub id: Uuid,
    pub page_id: Uuid,
    pub component_id: Uuid,
    pub component: Option<ComponentSummary>,
    pub props: ComponentProps,
    pub sort_order: i32,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PageComponent {
    pub fn component_type(&self) -> Option<ComponentType> {
        self.component.as_ref().map(|c| c.component_type)
    }
}

/// Fields for inserting a page component.
#[derive(Debug, Clone)]
pub struct NewPageComponent {
    pub page_id: Uuid,
    pub component_id: Uuid,
    pub props: Value,
    pub sort_order: i32,
    pub is_visible: bool,
}

/// One `(component id, new sort order)` pair of a reorder batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortAssignment {
    pub id: Uuid,
    pub sort_order: i32,
}

/// Request payload for `PUT /pages/:id/components/reorder`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderComponentsRequest {
    pub components: Vec<SortAssignment>,
}

/// Request payload for adding a component to a page.
#[derive(Debug, Clone, Deserialize)]
pub struct AddComponentRequest {
    #[serde(alias = "componentId")]
    pub component_id: Option<Uuid>,
    pub props: Option<Value>,
}

/// Request payload for updating a placed component.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateComponentRequest {
    pub props: Option<Value>,
    pub is_visible: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_request_deserialize() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"components": [{{"id": "{}", "sort_order": 3}}]}}"#, id);
        let req: ReorderComponentsRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req.components, vec![SortAssignment { id, sort_order: 3 }]);
    }

    #[test]
    fn test_add_component_request_missing_id() {
        let req: AddComponentRequest = serde_json::from_str(r#"{"props": {}}"#).unwrap();
        assert!(req.component_id.is_none());
    }
}
