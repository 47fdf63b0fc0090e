//! Unauthenticated site-facing endpoints under `/api/public`.

use axum::extract::{
    rejection::{PathRejection, QueryRejection},
    Path, Query, State,
};
use domain::models::{EntityType, LocalizedEntity, PublicPage, Redirect};
use serde::Deserialize;
use shared::pagination::PaginationParams;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_redirect_lookup;
use crate::routes::ApiResponse;

#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PublicListQuery {
    pub lang: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PublicListQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub path: String,
}

pub async fn get_page(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<LangQuery>, QueryRejection>,
) -> Result<ApiResponse<PublicPage>, ApiError> {
    let Path(slug) = path?;
    let Query(query) = query?;
    let page = state
        .pages()
        .render_public_page(&slug, query.lang.as_deref())
        .await?;
    Ok(ApiResponse::ok(page))
}

pub async fn list_redirects(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Redirect>>, ApiError> {
    Ok(ApiResponse::ok(state.redirects().list_active().await?))
}

pub async fn resolve_redirect(
    State(state): State<AppState>,
    query: Result<Query<ResolveQuery>, QueryRejection>,
) -> Result<ApiResponse<Redirect>, ApiError> {
    let Query(query) = query?;
    let redirect = state.redirects().resolve_path(&query.path).await?;
    record_redirect_lookup(redirect.is_some());

    redirect
        .map(ApiResponse::ok)
        .ok_or_else(|| ApiError::NotFound("Redirect not found".to_string()))
}

async fn get_entity(
    state: &AppState,
    entity_type: EntityType,
    slug: &str,
    lang: Option<&str>,
) -> Result<ApiResponse<LocalizedEntity>, ApiError> {
    let entity = state.i18n().resolve_entity(entity_type, slug, lang).await?;
    Ok(ApiResponse::ok(entity))
}

async fn list_entities(
    state: &AppState,
    entity_type: EntityType,
    query: &PublicListQuery,
) -> Result<ApiResponse<Vec<LocalizedEntity>>, ApiError> {
    let (entities, pagination) = state
        .i18n()
        .resolve_entities(entity_type, &query.pagination(), query.lang.as_deref())
        .await?;
    Ok(ApiResponse::paginated(entities, pagination))
}

pub async fn get_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<LangQuery>, QueryRejection>,
) -> Result<ApiResponse<LocalizedEntity>, ApiError> {
    let Path(slug) = path?;
    let Query(query) = query?;
    get_entity(&state, EntityType::Product, &slug, query.lang.as_deref()).await
}

pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<PublicListQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<LocalizedEntity>>, ApiError> {
    let Query(query) = query?;
    list_entities(&state, EntityType::Product, &query).await
}

pub async fn get_post(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<LangQuery>, QueryRejection>,
) -> Result<ApiResponse<LocalizedEntity>, ApiError> {
    let Path(slug) = path?;
    let Query(query) = query?;
    get_entity(&state, EntityType::Post, &slug, query.lang.as_deref()).await
}

pub async fn list_posts(
    State(state): State<AppState>,
    query: Result<Query<PublicListQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<LocalizedEntity>>, ApiError> {
    let Query(query) = query?;
    list_entities(&state, EntityType::Post, &query).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_list_query_pagination() {
        let query: PublicListQuery =
            serde_json::from_str(r#"{"lang": "hi", "page": 2, "limit": 5}"#).unwrap();
        let params = query.pagination();
        assert_eq!(params.page(), 2);
        assert_eq!(params.limit(), 5);
        assert_eq!(query.lang.as_deref(), Some("hi"));
    }
}
