//! Domain error taxonomy.

use thiserror::Error;

use crate::services::store::StoreError;

pub type DomainResult<T> = Result<T, DomainError>;

/// Errors surfaced by domain services.
///
/// Services return these unlogged; the HTTP boundary decides status codes and
/// what reaches the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl DomainError {
    pub fn not_found(what: &str) -> Self {
        DomainError::NotFound(format!("{} not found", what))
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        DomainError::InvalidArgument(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        DomainError::Conflict(msg.into())
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => DomainError::StoreUnavailable(msg),
            StoreError::UniqueViolation(constraint) => {
                DomainError::Conflict(unique_violation_message(&constraint).to_string())
            }
            StoreError::ForeignKeyViolation(constraint) => {
                DomainError::NotFound(foreign_key_violation_message(&constraint).to_string())
            }
        }
    }
}

/// Client-facing text for a violated unique constraint. Unknown names are not
/// echoed.
fn unique_violation_message(constraint: &str) -> &'static str {
    match constraint {
        "pages_slug_key" => "Page with this slug already exists",
        "page_components_page_sort_unique" => {
            "Sort order is already taken on this page, retry the request"
        }
        "languages_code_key" => "Language with this code already exists",
        "idx_languages_single_default" => "Another language became default concurrently",
        "i18n_content_unique" => "Translation entry already exists",
        "redirects_active_from_path_idx" => "An active redirect already exists for this path",
        _ => "Resource already exists",
    }
}

fn foreign_key_violation_message(constraint: &str) -> &'static str {
    match constraint {
        "page_components_page_id_fkey" => "Page not found",
        "page_components_component_id_fkey" => "Component not found",
        "i18n_content_language_id_fkey" => "Language not found",
        _ => "Referenced resource not found",
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| format!("{}: {}", field, m))
                        .unwrap_or_else(|| format!("{}: invalid value", field))
                })
            })
            .collect();
        DomainError::InvalidArgument(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        assert_eq!(
            DomainError::from(StoreError::Unavailable("timeout".into())),
            DomainError::StoreUnavailable("timeout".into())
        );
        assert_eq!(
            DomainError::from(StoreError::UniqueViolation("pages_slug_key".into())),
            DomainError::Conflict("Page with this slug already exists".into())
        );
        assert_eq!(
            DomainError::from(StoreError::ForeignKeyViolation(
                "page_components_page_id_fkey".into()
            )),
            DomainError::not_found("Page")
        );
    }

    #[test]
    fn test_constraint_names_never_reach_clients() {
        let sort_clash = DomainError::from(StoreError::UniqueViolation(
            "page_components_page_sort_unique".into(),
        ));
        assert!(matches!(&sort_clash, DomainError::Conflict(_)));
        assert!(!sort_clash.to_string().contains("page_components"));

        assert_eq!(
            DomainError::from(StoreError::UniqueViolation("some_new_index".into())).to_string(),
            "Resource already exists"
        );
        assert_eq!(
            DomainError::from(StoreError::ForeignKeyViolation("some_fkey".into())).to_string(),
            "Referenced resource not found"
        );
    }

    #[test]
    fn test_helpers() {
        assert_eq!(
            DomainError::not_found("Page"),
            DomainError::NotFound("Page not found".into())
        );
        assert_eq!(
            DomainError::invalid("bad").to_string(),
            "bad".to_string()
        );
        assert_eq!(DomainError::Forbidden.to_string(), "Insufficient permissions");
    }
}
