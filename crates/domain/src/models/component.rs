//! Component catalog and typed component props.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Closed set of component kinds a page can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Hero,
    Text,
    Gallery,
    Form,
    Cta,
    Features,
    Testimonials,
}

impl ComponentType {
    pub const ALL: [ComponentType; 7] = [
        ComponentType::Hero,
        ComponentType::Text,
        ComponentType::Gallery,
        ComponentType::Form,
        ComponentType::Cta,
        ComponentType::Features,
        ComponentType::Testimonials,
    ];
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentType::Hero => write!(f, "hero"),
            ComponentType::Text => write!(f, "text"),
            ComponentType::Gallery => write!(f, "gallery"),
            ComponentType::Form => write!(f, "form"),
            ComponentType::Cta => write!(f, "cta"),
            ComponentType::Features => write!(f, "features"),
            ComponentType::Testimonials => write!(f, "testimonials"),
        }
    }
}

impl std::str::FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hero" => Ok(ComponentType::Hero),
            "text" => Ok(ComponentType::Text),
            "gallery" => Ok(ComponentType::Gallery),
            "form" => Ok(ComponentType::Form),
            "cta" => Ok(ComponentType::Cta),
            "features" => Ok(ComponentType::Features),
            "testimonials" => Ok(ComponentType::Testimonials),
            _ => Err(format!("Unknown component type: {}", s)),
        }
    }
}

/// Catalog entry a page component is instantiated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ComponentDefinition {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub name: String,
    pub description: Option<String>,
    pub default_props: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroProps {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub images: Vec<GalleryImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtaProps {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturesProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<FeatureItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestimonialItem {
    pub quote: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestimonialsProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<TestimonialItem>,
}

/// Props of a placed component, decoded by its component type.
///
/// Serializes as the flat field set; the type tag lives on the page component.
/// Payloads that do not fit the typed shape of their tag are kept verbatim as
/// `Unknown`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComponentProps {
    Hero(HeroProps),
    Text(TextProps),
    Gallery(GalleryProps),
    Form(FormProps),
    Cta(CtaProps),
    Features(FeaturesProps),
    Testimonials(TestimonialsProps),
    Unknown(Value),
}

impl ComponentProps {
    /// Decodes raw props for the given component type.
    pub fn decode(component_type: Option<ComponentType>, raw: Value) -> Self {
        let Some(component_type) = component_type else {
            return ComponentProps::Unknown(raw);
        };

        let typed = match component_type {
            ComponentType::Hero => serde_json::from_value(raw.clone()).map(ComponentProps::Hero),
            ComponentType::Text => serde_json::from_value(raw.clone()).map(ComponentProps::Text),
            ComponentType::Gallery => {
                serde_json::from_value(raw.clone()).map(ComponentProps::Gallery)
            }
            ComponentType::Form => serde_json::from_value(raw.clone()).map(ComponentProps::Form),
            ComponentType::Cta => serde_json::from_value(raw.clone()).map(ComponentProps::Cta),
            ComponentType::Features => {
                serde_json::from_value(raw.clone()).map(ComponentProps::Features)
            }
            ComponentType::Testimonials => {
                serde_json::from_value(raw.clone()).map(ComponentProps::Testimonials)
            }
        };

        typed.unwrap_or(ComponentProps::Unknown(raw))
    }

    /// The component type this variant belongs to, if typed.
    pub fn component_type(&self) -> Option<ComponentType> {
        match self {
            ComponentProps::Hero(_) => Some(ComponentType::Hero),
            ComponentProps::Text(_) => Some(ComponentType::Text),
            ComponentProps::Gallery(_) => Some(ComponentType::Gallery),
            ComponentProps::Form(_) => Some(ComponentType::Form),
            ComponentProps::Cta(_) => Some(ComponentType::Cta),
            ComponentProps::Features(_) => Some(ComponentType::Features),
            ComponentProps::Testimonials(_) => Some(ComponentType::Testimonials),
            ComponentProps::Unknown(_) => None,
        }
    }

    /// Re-encodes props as stored JSON.
    pub fn to_value(&self) -> Value {
        match self {
            ComponentProps::Unknown(raw) => raw.clone(),
            other => serde_json::to_value(other).unwrap_or(Value::Null),
        }
    }

    pub fn is_typed(&self) -> bool {
        !matches!(self, ComponentProps::Unknown(_))
    }
}

impl Default for ComponentProps {
    fn default() -> Self {
        ComponentProps::Unknown(Value::Object(Default::default()))
    }
}
