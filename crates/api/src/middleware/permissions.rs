//! Permission gates for admin routes.
//!
//! Each gate admits the request if the authenticated principal holds the
//! named permission or the global wildcard. Gates run after
//! [`require_user_auth`](super::user_auth::require_user_auth); a request that
//! reaches one without a principal is rejected as unauthenticated.

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::models::{authorize, Principal, GLOBAL_WILDCARD};

use crate::error::ApiError;

async fn gate(required: &'static str, req: Request<Body>, next: Next) -> Response {
    let principal = req.extensions().get::<Principal>();

    match authorize(principal, &[required, GLOBAL_WILDCARD]) {
        Ok(()) => next.run(req).await,
        Err(e) => {
            if let Some(p) = principal {
                tracing::debug!(user_id = %p.user_id, required, "Permission denied");
            }
            ApiError::from(e).into_response()
        }
    }
}

pub async fn require_pages_read(req: Request<Body>, next: Next) -> Response {
    gate("pages.read", req, next).await
}

pub async fn require_pages_create(req: Request<Body>, next: Next) -> Response {
    gate("pages.create", req, next).await
}

pub async fn require_pages_update(req: Request<Body>, next: Next) -> Response {
    gate("pages.update", req, next).await
}

pub async fn require_pages_delete(req: Request<Body>, next: Next) -> Response {
    gate("pages.delete", req, next).await
}

/// Any SEO permission. `seo.*` is checked literally, so only a domain or
/// global wildcard grant passes.
pub async fn require_seo_any(req: Request<Body>, next: Next) -> Response {
    gate("seo.*", req, next).await
}

pub async fn require_seo_read(req: Request<Body>, next: Next) -> Response {
    gate("seo.read", req, next).await
}

pub async fn require_seo_update(req: Request<Body>, next: Next) -> Response {
    gate("seo.update", req, next).await
}

pub async fn require_settings_read(req: Request<Body>, next: Next) -> Response {
    gate("settings.read", req, next).await
}

pub async fn require_settings_update(req: Request<Body>, next: Next) -> Response {
    gate("settings.update", req, next).await
}
