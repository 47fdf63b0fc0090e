//! Bearer token authentication for the admin API.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::models::Principal;
use shared::jwt::{extract_role_id, extract_user_id, Claims, JwtConfig, JwtError};

use crate::app::AppState;
use crate::error::ApiError;

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn principal_from_claims(claims: Claims) -> Result<Principal, JwtError> {
    let user_id = extract_user_id(&claims)?;
    let role_id = extract_role_id(&claims)?;
    Ok(Principal {
        user_id,
        email: claims.email,
        role_id,
        permissions: claims.permissions,
    })
}

/// Validates the token and builds the request principal.
///
/// Permissions are exactly the snapshot embedded at issue time. Role changes
/// reach a user only through a newly issued token.
pub fn authenticate(jwt: &JwtConfig, token: &str) -> Result<Principal, ApiError> {
    let claims = jwt.validate_access_token(token).map_err(|e| {
        tracing::debug!(error = %e, "Access token rejected");
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    principal_from_claims(claims)
        .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))
}

/// Rejects the request with 401 unless it carries a valid access token.
/// The resolved [`Principal`] is stored in request extensions.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        return ApiError::Unauthorized("Missing or invalid Authorization header".to_string())
            .into_response();
    };

    match authenticate(&state.jwt, token) {
        Ok(principal) => {
            tracing::debug!(user_id = %principal.user_id, "Authenticated request");
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::jwt::TokenSubject;
    use uuid::Uuid;

    const SECRET: &str = "test-secret-that-is-at-least-32-characters-long";

    fn jwt() -> JwtConfig {
        JwtConfig::from_secret(SECRET, 3600, 0).unwrap()
    }

    fn token(role_id: Option<Uuid>, permissions: &[&str]) -> String {
        let subject = TokenSubject {
            user_id: Uuid::new_v4(),
            email: Some("editor@example.com".to_string()),
            role_id,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        };
        jwt().generate_access_token(&subject).unwrap().0
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[test]
    fn test_authenticate_uses_token_permissions() {
        let principal = authenticate(&jwt(), &token(None, &["pages.*"])).unwrap();
        assert_eq!(principal.permissions, vec!["pages.*".to_string()]);
        assert_eq!(principal.email.as_deref(), Some("editor@example.com"));
    }

    #[test]
    fn test_empty_snapshot_grants_nothing_despite_role() {
        let role_id = Uuid::new_v4();
        let principal = authenticate(&jwt(), &token(Some(role_id), &[])).unwrap();
        assert_eq!(principal.role_id, Some(role_id));
        assert!(principal.permissions.is_empty());
    }

    #[test]
    fn test_authenticate_rejects_garbage() {
        let result = authenticate(&jwt(), "not-a-jwt");
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_authenticate_rejects_foreign_signature() {
        let other = JwtConfig::from_secret("another-secret-that-is-also-32-chars-long!", 3600, 0)
            .unwrap();
        let subject = TokenSubject {
            user_id: Uuid::new_v4(),
            email: None,
            role_id: None,
            permissions: vec!["*".to_string()],
        };
        let (foreign, _) = other.generate_access_token(&subject).unwrap();

        let result = authenticate(&jwt(), &foreign);
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }
}
