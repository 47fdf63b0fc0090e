//! Handler access to the authenticated principal.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::Principal;

use crate::error::ApiError;

/// The principal inserted by `require_user_auth`.
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthPrincipal)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}
