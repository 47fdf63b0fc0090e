//! Admin redirect management under `/api/seo/redirects`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use domain::models::{CreateRedirectRequest, Redirect, UpdateRedirectRequest};
use shared::pagination::PaginationParams;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthPrincipal;
use crate::routes::ApiResponse;

pub async fn list_redirects(
    State(state): State<AppState>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<ApiResponse<Vec<Redirect>>, ApiError> {
    let Query(params) = query?;
    let (redirects, pagination) = state.redirects().list(&params).await?;
    Ok(ApiResponse::paginated(redirects, pagination))
}

pub async fn create_redirect(
    State(state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    payload: Result<Json<CreateRedirectRequest>, JsonRejection>,
) -> Result<ApiResponse<Redirect>, ApiError> {
    let Json(request) = payload?;
    let redirect = state
        .redirects()
        .create(request, Some(principal.user_id))
        .await?;

    tracing::info!(
        redirect_id = %redirect.id,
        from_path = %redirect.from_path,
        to_path = %redirect.to_path,
        created_by = %principal.user_id,
        "Redirect created"
    );

    Ok(ApiResponse::created(redirect).with_message("Redirect created successfully"))
}

pub async fn get_redirect(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<Redirect>, ApiError> {
    let Path(id) = path?;
    Ok(ApiResponse::ok(state.redirects().get(id).await?))
}

pub async fn update_redirect(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateRedirectRequest>, JsonRejection>,
) -> Result<ApiResponse<Redirect>, ApiError> {
    let Path(id) = path?;
    let Json(request) = payload?;
    let redirect = state.redirects().update(id, request).await?;
    Ok(ApiResponse::ok(redirect).with_message("Redirect updated successfully"))
}

pub async fn delete_redirect(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<()>, ApiError> {
    let Path(id) = path?;
    state.redirects().delete(id).await?;

    tracing::info!(redirect_id = %id, "Redirect deleted");

    Ok(ApiResponse::message("Redirect deleted successfully"))
}
