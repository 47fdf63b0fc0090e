//! Admin page and page component handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use domain::models::{
    AddComponentRequest, CreatePageRequest, Page, PageComponent, PageWithComponents,
    ReorderComponentsRequest, UpdateComponentRequest, UpdatePageRequest,
};
use shared::pagination::PaginationParams;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_components_reordered;
use crate::routes::ApiResponse;

pub async fn list_pages(
    State(state): State<AppState>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<ApiResponse<Vec<Page>>, ApiError> {
    let Query(params) = query?;
    let (pages, pagination) = state.pages().list_pages(&params).await?;
    Ok(ApiResponse::paginated(pages, pagination))
}

pub async fn create_page(
    State(state): State<AppState>,
    payload: Result<Json<CreatePageRequest>, JsonRejection>,
) -> Result<ApiResponse<Page>, ApiError> {
    let Json(request) = payload?;
    let page = state.pages().create_page(request).await?;

    tracing::info!(page_id = %page.id, slug = %page.slug, "Page created");

    Ok(ApiResponse::created(page).with_message("Page created successfully"))
}

pub async fn get_page(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<PageWithComponents>, ApiError> {
    let Path(id) = path?;
    Ok(ApiResponse::ok(state.pages().get_page(id).await?))
}

pub async fn update_page(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdatePageRequest>, JsonRejection>,
) -> Result<ApiResponse<Page>, ApiError> {
    let Path(id) = path?;
    let Json(request) = payload?;
    let page = state.pages().update_page(id, request).await?;
    Ok(ApiResponse::ok(page).with_message("Page updated successfully"))
}

pub async fn delete_page(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<()>, ApiError> {
    let Path(id) = path?;
    state.pages().delete_page(id).await?;

    tracing::info!(page_id = %id, "Page deleted");

    Ok(ApiResponse::message("Page deleted successfully"))
}

pub async fn toggle_publish(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<Page>, ApiError> {
    let Path(id) = path?;
    let page = state.pages().toggle_publish(id).await?;
    let message = if page.is_published {
        "Page published successfully"
    } else {
        "Page unpublished successfully"
    };
    Ok(ApiResponse::ok(page).with_message(message))
}

pub async fn list_components(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<Vec<PageComponent>>, ApiError> {
    let Path(page_id) = path?;
    Ok(ApiResponse::ok(state.pages().list_components(page_id).await?))
}

pub async fn add_component(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<AddComponentRequest>, JsonRejection>,
) -> Result<ApiResponse<PageComponent>, ApiError> {
    let Path(page_id) = path?;
    let Json(request) = payload?;
    let component = state.pages().add_component(page_id, request).await?;
    Ok(ApiResponse::created(component).with_message("Component added to page successfully"))
}

pub async fn reorder_components(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ReorderComponentsRequest>, JsonRejection>,
) -> Result<ApiResponse<PageWithComponents>, ApiError> {
    let Path(page_id) = path?;
    let Json(request) = payload?;
    let page = state.pages().reorder(page_id, &request.components).await?;
    record_components_reordered(request.components.len());
    Ok(ApiResponse::ok(page).with_message("Components reordered successfully"))
}

pub async fn update_component(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateComponentRequest>, JsonRejection>,
) -> Result<ApiResponse<PageComponent>, ApiError> {
    let Path(id) = path?;
    let Json(request) = payload?;
    let component = state.pages().update_component(id, request).await?;
    Ok(ApiResponse::ok(component).with_message("Component updated successfully"))
}

pub async fn remove_component(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<()>, ApiError> {
    let Path(id) = path?;
    if !state.pages().remove_component(id).await? {
        return Err(ApiError::NotFound("Component not found".to_string()));
    }
    Ok(ApiResponse::message("Component removed from page successfully"))
}
