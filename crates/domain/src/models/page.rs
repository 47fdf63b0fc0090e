//! Page domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::component::{ComponentProps, ComponentType};
use crate::models::page_component::PageComponent;

/// Template used when a page is created without one.
pub const DEFAULT_TEMPLATE: &str = "default";

/// A CMS page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Page {
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

/// A page together with its components in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageWithComponents {
    #[serde(flatten)]
    pub page: Page,
    pub components: Vec<PageComponent>,
}

/// Fields for inserting a page.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub name: String,
    pub slug: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_published: bool,
    pub template: String,
}

/// Partial page update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct PageChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_published: Option<bool>,
    pub template: Option<String>,
}

/// Request payload for creating a page.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePageRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_slug"))]
    pub slug: String,

    #[validate(length(max = 255, message = "Title too long"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description too long"))]
    pub description: Option<String>,

    #[serde(default)]
    pub is_published: bool,

    #[validate(length(min = 1, max = 100, message = "Template must be 1-100 characters"))]
    pub template: Option<String>,
}

impl From<CreatePageRequest> for NewPage {
    fn from(req: CreatePageRequest) -> Self {
        NewPage {
            name: req.name,
            slug: req.slug,
            title: req.title,
            description: req.description,
            is_published: req.is_published,
            template: req.template.unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
        }
    }
}

/// Request payload for updating a page.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePageRequest {
    #[validate(length(min = 1, max = 255, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(custom(function = "shared::validation::validate_slug"))]
    pub slug: Option<String>,

    #[validate(length(max = 255, message = "Title too long"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description too long"))]
    pub description: Option<String>,

    pub is_published: Option<bool>,

    #[validate(length(min = 1, max = 100, message = "Template must be 1-100 characters"))]
    pub template: Option<String>,
}

impl From<UpdatePageRequest> for PageChanges {
    fn from(req: UpdatePageRequest) -> Self {
        PageChanges {
            name: req.name,
            slug: req.slug,
            title: req.title,
            description: req.description,
            is_published: req.is_published,
            template: req.template,
        }
    }
}

/// Published page as served to the public site, localized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicPage {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub template: String,
    pub language: String,
    pub components: Vec<PublicComponent>,
}

/// Visible component on a public page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicComponent {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub component_type: Option<ComponentType>,
    pub props: ComponentProps,
    pub sort_order: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(slug: &str) -> CreatePageRequest {
        CreatePageRequest {
            name: "Test Page".to_string(),
            slug: slug.to_string(),
            title: None,
            description: None,
            is_published: false,
            template: None,
        }
    }

    #[test]
    fn test_create_request_validation() {
        assert!(create_request("test-page").validate().is_ok());
        assert!(create_request("Test Page").validate().is_err());
        assert!(create_request("").validate().is_err());
    }

    #[test]
    fn test_create_request_requires_name() {
        let mut req = create_request("test-page");
        req.name = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_new_page_defaults_template() {
        let page: NewPage = create_request("home").into();
        assert_eq!(page.template, DEFAULT_TEMPLATE);
        assert!(!page.is_published);
    }

    #[test]
    fn test_update_request_validation() {
        assert!(UpdatePageRequest::default().validate().is_ok());

        let bad = UpdatePageRequest {
            slug: Some("Bad Slug".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_create_request_deserialize_defaults() {
        let req: CreatePageRequest =
            serde_json::from_str(r#"{"name": "About", "slug": "about"}"#).unwrap();
        assert!(!req.is_published);
        assert!(req.template.is_none());
    }

    #[test]
    fn test_page_with_components_flattens() {
        let now = Utc::now();
        let page = PageWithComponents {
            page: Page {
                id: Uuid::nil(),
                name: "About".to_string(),
                slug: "about".to_string(),
                title: None,
                description: None,
                is_published: true,
                template: DEFAULT_TEMPLATE.to_string(),
                created_at: now,
                updated_at: now,
            },
            components: vec![],
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["slug"], "about");
        assert!(json["components"].as_array().unwrap().is_empty());
    }
}
