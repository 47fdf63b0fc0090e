//! Authenticated principal carried on each request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::permission::has_any;

/// Identity of an authenticated request with its permission snapshot.
///
/// The snapshot is taken when the token is issued. Role changes take effect on
/// the next token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role_id: Option<Uuid>,
    pub permissions: Vec<String>,
}

impl Principal {
    pub fn new(user_id: Uuid, role_id: Option<Uuid>, permissions: Vec<String>) -> Self {
        Self {
            user_id,
            email: None,
            role_id,
            permissions,
        }
    }

    /// Returns true if any of `required` is granted.
    pub fn can_any(&self, required: &[&str]) -> bool {
        has_any(&self.permissions, required)
    }
}

/// Decides access for an optional principal.
///
/// No principal is `Unauthenticated`; a principal lacking every one of
/// `required` is `Forbidden`.
pub fn authorize(principal: Option<&Principal>, required: &[&str]) -> Result<(), DomainError> {
    match principal {
        None => Err(DomainError::Unauthenticated),
        Some(p) if p.can_any(required) => Ok(()),
        Some(_) => Err(DomainError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(perms: &[&str]) -> Principal {
        Principal::new(
            Uuid::new_v4(),
            None,
            perms.iter().map(|p| p.to_string()).collect(),
        )
    }

    #[test]
    fn test_authorize_without_principal() {
        assert_eq!(
            authorize(None, &["pages.update", "*"]),
            Err(DomainError::Unauthenticated)
        );
    }

    #[test]
    fn test_authorize_forbidden() {
        let p = principal(&["blog.read"]);
        assert_eq!(
            authorize(Some(&p), &["pages.update", "*"]),
            Err(DomainError::Forbidden)
        );
    }

    #[test]
    fn test_authorize_allowed() {
        assert!(authorize(Some(&principal(&["pages.*"])), &["pages.update", "*"]).is_ok());
        assert!(authorize(Some(&principal(&["*"])), &["pages.update", "*"]).is_ok());
    }

    #[test]
    fn test_empty_permissions_always_forbidden() {
        let p = principal(&[]);
        assert!(!p.can_any(&["pages.read", "*"]));
    }
}
