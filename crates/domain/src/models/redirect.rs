//! URL redirect domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// HTTP status used for a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum RedirectType {
    #[default]
    Permanent,
    Temporary,
}

impl RedirectType {
    pub fn status_code(&self) -> i32 {
        match self {
            RedirectType::Permanent => 301,
            RedirectType::Temporary => 302,
        }
    }
}

impl TryFrom<i32> for RedirectType {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            301 => Ok(RedirectType::Permanent),
            302 => Ok(RedirectType::Temporary),
            other => Err(format!("Redirect type must be 301 or 302, got {}", other)),
        }
    }
}

impl From<RedirectType> for i32 {
    fn from(t: RedirectType) -> Self {
        t.status_code()
    }
}

impl std::fmt::Display for RedirectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status_code())
    }
}

/// A path redirect. At most one active redirect exists per `from_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Redirect {
    pub id: Uuid,
    pub from_path: String,
    pub to_path: String,
    #[serde(rename = "type")]
    pub redirect_type: RedirectType,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a redirect.
#[derive(Debug, Clone)]
pub struct NewRedirect {
    pub from_path: String,
    pub to_path: String,
    pub redirect_type: RedirectType,
    pub created_by: Option<Uuid>,
}

/// Partial redirect update.
#[derive(Debug, Clone, Default)]
pub struct RedirectChanges {
    pub to_path: Option<String>,
    pub redirect_type: Option<RedirectType>,
    pub is_active: Option<bool>,
}

/// Request payload for creating a redirect.
///
/// `type` stays a raw integer so an unsupported code is reported as a
/// validation failure rather than a body rejection.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRedirectRequest {
    #[validate(custom(function = "shared::validation::validate_site_path"))]
    pub from_path: String,

    #[validate(custom(function = "shared::validation::validate_site_path"))]
    pub to_path: String,

    #[serde(rename = "type")]
    pub redirect_type: Option<i32>,
}

/// Request payload for updating a redirect.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRedirectRequest {
    #[validate(custom(function = "shared::validation::validate_site_path"))]
    pub to_path: Option<String>,

    #[serde(rename = "type")]
    pub redirect_type: Option<i32>,

    pub is_active: Option<bool>,
}
