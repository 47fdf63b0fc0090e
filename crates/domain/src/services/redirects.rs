//! Redirect registry with one active redirect per source path.

use std::sync::Arc;

use shared::pagination::{Pagination, PaginationParams};
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::models::{
    CreateRedirectRequest, NewRedirect, Redirect, RedirectChanges, RedirectType,
    UpdateRedirectRequest,
};
use crate::services::store::EntityStore;

#[derive(Clone)]
pub struct RedirectRegistry {
    store: Arc<dyn EntityStore>,
}

impl RedirectRegistry {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Creates an active redirect. Type defaults to 301.
    pub async fn create(
        &self,
        request: CreateRedirectRequest,
        created_by: Option<Uuid>,
    ) -> DomainResult<Redirect> {
        request.validate()?;

        if request.from_path == request.to_path {
            return Err(DomainError::invalid("from_path and to_path must differ"));
        }
        let redirect_type = parse_type(request.redirect_type)?.unwrap_or_default();

        if self
            .store
            .find_active_redirect_by_path(&request.from_path)
            .await?
            .is_some()
        {
            return Err(active_conflict(&request.from_path));
        }

        let from_path = request.from_path.clone();
        let redirect = self
            .store
            .insert_redirect(NewRedirect {
                from_path: request.from_path,
                to_path: request.to_path,
                redirect_type,
                created_by,
            })
            .await
            .map_err(|e| match DomainError::from(e) {
                DomainError::Conflict(_) => active_conflict(&from_path),
                other => other,
            })?;

        tracing::debug!(
            redirect_id = %redirect.id,
            from_path = %redirect.from_path,
            redirect_type = %redirect.redirect_type,
            "Created redirect"
        );

        Ok(redirect)
    }

    /// Changes target, type or activation.
    pub async fn update(&self, id: Uuid, request: UpdateRedirectRequest) -> DomainResult<Redirect> {
        request.validate()?;
        let redirect_type = parse_type(request.redirect_type)?;

        let current = self.get(id).await?;

        if request.to_path.as_deref() == Some(current.from_path.as_str()) {
            return Err(DomainError::invalid("from_path and to_path must differ"));
        }

        if request.is_active == Some(true) && !current.is_active {
            if let Some(active) = self
                .store
                .find_active_redirect_by_path(&current.from_path)
                .await?
            {
                if active.id != id {
                    return Err(active_conflict(&current.from_path));
                }
            }
        }

        let changes = RedirectChanges {
            to_path: request.to_path,
            redirect_type,
            is_active: request.is_active,
        };

        self.store
            .update_redirect(id, changes)
            .await
            .map_err(|e| match DomainError::from(e) {
                DomainError::Conflict(_) => active_conflict(&current.from_path),
                other => other,
            })?
            .ok_or_else(|| DomainError::not_found("Redirect"))
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Redirect> {
        self.store
            .find_redirect(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Redirect"))
    }

    /// All redirects, newest first.
    pub async fn list(
        &self,
        pagination: &PaginationParams,
    ) -> DomainResult<(Vec<Redirect>, Pagination)> {
        let redirects = self
            .store
            .list_redirects(pagination.limit() as i64, pagination.offset())
            .await?;
        let total = self.store.count_redirects().await?;
        Ok((redirects, pagination.meta(total)))
    }

    /// Active redirects, newest first.
    pub async fn list_active(&self) -> DomainResult<Vec<Redirect>> {
        Ok(self.store.list_active_redirects().await?)
    }

    /// The active redirect for `path`, if any.
    pub async fn resolve_path(&self, path: &str) -> DomainResult<Option<Redirect>> {
        Ok(self.store.find_active_redirect_by_path(path).await?)
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        if self.store.delete_redirect(id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Redirect"))
        }
    }
}

fn parse_type(code: Option<i32>) -> DomainResult<Option<RedirectType>> {
    code.map(RedirectType::try_from)
        .transpose()
        .map_err(DomainError::InvalidArgument)
}

fn active_conflict(from_path: &str) -> DomainError {
    DomainError::conflict(format!(
        "An active redirect already exists for {}",
        from_path
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory::InMemoryStore;

    fn registry() -> RedirectRegistry {
        RedirectRegistry::new(Arc::new(InMemoryStore::new()))
    }

    fn create_request(from: &str, to: &str, redirect_type: Option<i32>) -> CreateRedirectRequest {
        CreateRedirectRequest {
            from_path: from.to_string(),
            to_path: to.to_string(),
            redirect_type,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_permanent() {
        let registry = registry();
        let created_by = Uuid::new_v4();
        let redirect = registry
            .create(create_request("/old", "/new", None), Some(created_by))
            .await
            .unwrap();

        assert_eq!(redirect.redirect_type, RedirectType::Permanent);
        assert!(redirect.is_active);
        assert_eq!(redirect.created_by, Some(created_by));
    }

    #[tokio::test]
    async fn test_second_active_redirect_conflicts() {
        let registry = registry();
        registry
            .create(create_request("/old", "/new", None), None)
            .await
            .unwrap();

        let result = registry
            .create(create_request("/old", "/newer", Some(302)), None)
            .await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_deactivate_then_create_succeeds() {
        let registry = registry();
        let first = registry
            .create(create_request("/old", "/new", None), None)
            .await
            .unwrap();
        registry
            .update(
                first.id,
                UpdateRedirectRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let second = registry
            .create(create_request("/old", "/newer", Some(302)), None)
            .await
            .unwrap();
        assert_eq!(second.redirect_type, RedirectType::Temporary);

        let reactivate = registry
            .update(
                first.id,
                UpdateRedirectRequest {
                    is_active: Some(true),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(reactivate, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_validation() {
        let registry = registry();

        let relative = registry
            .create(create_request("old", "/new", None), None)
            .await;
        assert!(matches!(relative, Err(DomainError::InvalidArgument(_))));

        let same = registry
            .create(create_request("/same", "/same", None), None)
            .await;
        assert!(matches!(same, Err(DomainError::InvalidArgument(_))));

        let bad_type = registry
            .create(create_request("/old", "/new", Some(307)), None)
            .await;
        assert!(matches!(bad_type, Err(DomainError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_list_active_newest_first() {
        let registry = registry();
        let a = registry
            .create(create_request("/a", "/x", None), None)
            .await
            .unwrap();
        let b = registry
            .create(create_request("/b", "/x", None), None)
            .await
            .unwrap();
        let c = registry
            .create(create_request("/c", "/x", None), None)
            .await
            .unwrap();
        registry
            .update(
                b.id,
                UpdateRedirectRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let active: Vec<Uuid> = registry
            .list_active()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(active, vec![c.id, a.id]);

        let (all, meta) = registry.list(&PaginationParams::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(meta.total, 3);
    }

    #[tokio::test]
    async fn test_delete_then_get_not_found() {
        let registry = registry();
        let redirect = registry
            .create(create_request("/old", "/new", None), None)
            .await
            .unwrap();

        registry.delete(redirect.id).await.unwrap();
        assert_eq!(
            registry.get(redirect.id).await.unwrap_err(),
            DomainError::not_found("Redirect")
        );
        assert!(matches!(
            registry.delete(redirect.id).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_target_and_type() {
        let registry = registry();
        let redirect = registry
            .create(create_request("/old", "/new", None), None)
            .await
            .unwrap();

        let updated = registry
            .update(
                redirect.id,
                UpdateRedirectRequest {
                    to_path: Some("/newest".to_string()),
                    redirect_type: Some(302),
                    is_active: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.to_path, "/newest");
        assert_eq!(updated.redirect_type, RedirectType::Temporary);

        let loop_back = registry
            .update(
                redirect.id,
                UpdateRedirectRequest {
                    to_path: Some("/old".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(loop_back, Err(DomainError::InvalidArgument(_))));

        let missing = registry
            .update(Uuid::new_v4(), UpdateRedirectRequest::default())
            .await;
        assert!(matches!(missing, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_path() {
        let registry = registry();
        registry
            .create(create_request("/old", "/new", None), None)
            .await
            .unwrap();

        let found = registry.resolve_path("/old").await.unwrap().unwrap();
        assert_eq!(found.to_path, "/new");
        assert!(registry.resolve_path("/missing").await.unwrap().is_none());
    }
}
