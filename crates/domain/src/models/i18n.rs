//! Languages and per-field translation entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

/// Field name to JSON value.
pub type FieldMap = serde_json::Map<String, Value>;

/// Language used when the store has no default row.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Kinds of entities that can carry translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Product,
    Post,
    Page,
    PageComponent,
}

impl EntityType {
    /// Entity types served as standalone published records.
    pub fn is_catalog(&self) -> bool {
        matches!(self, EntityType::Product | EntityType::Post)
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Product => write!(f, "product"),
            EntityType::Post => write!(f, "post"),
            EntityType::Page => write!(f, "page"),
            EntityType::PageComponent => write!(f, "page_component"),
        }
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(EntityType::Product),
            "post" => Ok(EntityType::Post),
            "page" => Ok(EntityType::Page),
            "page_component" => Ok(EntityType::PageComponent),
            _ => Err(format!("Unknown entity type: {}", s)),
        }
    }
}

/// A site language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Language {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub native_name: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a language.
#[derive(Debug, Clone)]
pub struct NewLanguage {
    pub code: String,
    pub name: String,
    pub native_name: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
}

/// Partial language update.
#[derive(Debug, Clone, Default)]
pub struct LanguageChanges {
    pub name: Option<String>,
    pub native_name: Option<String>,
    pub is_default: Option<bool>,
    pub is_active: Option<bool>,
}

/// Request payload for creating a language.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLanguageRequest {
    #[validate(custom(function = "shared::validation::validate_language_code"))]
    pub code: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 100, message = "Native name too long"))]
    pub native_name: Option<String>,

    #[serde(default)]
    pub is_default: bool,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl From<CreateLanguageRequest> for NewLanguage {
    fn from(req: CreateLanguageRequest) -> Self {
        NewLanguage {
            code: req.code,
            name: req.name,
            native_name: req.native_name,
            is_default: req.is_default,
            is_active: req.is_active,
        }
    }
}

/// Request payload for updating a language. The code is immutable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLanguageRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Native name too long"))]
    pub native_name: Option<String>,

    pub is_default: Option<bool>,

    pub is_active: Option<bool>,
}

impl From<UpdateLanguageRequest> for LanguageChanges {
    fn from(req: UpdateLanguageRequest) -> Self {
        LanguageChanges {
            name: req.name,
            native_name: req.native_name,
            is_default: req.is_default,
            is_active: req.is_active,
        }
    }
}

/// A stored translation of one field of one entity into one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct I18nEntry {
    pub id: Uuid,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub language_id: Uuid,
    pub language_code: String,
    pub field_name: String,
    pub field_value: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting or replacing a translation.
#[derive(Debug, Clone)]
pub struct NewTranslation {
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub language_id: Uuid,
    pub field_name: String,
    pub field_value: Value,
}

/// Request payload for `POST /i18n/content`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertTranslationRequest {
    pub entity_type: EntityType,

    pub entity_id: Uuid,

    #[validate(custom(function = "shared::validation::validate_language_code"))]
    pub language_code: String,

    #[validate(length(min = 1, max = 100, message = "Field name must be 1-100 characters"))]
    pub field_name: String,

    pub field_value: Value,
}

/// Query parameters for `GET /i18n/content`.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationQuery {
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub language_code: Option<String>,
}

/// Canonical row of a localizable record (product or post).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEntity {
    pub id: Uuid,
    pub slug: String,
    pub fields: FieldMap,
}

/// A record after translation overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedEntity {
    pub id: Uuid,
    pub slug: String,
    pub language: String,
    pub fields: FieldMap,
}
