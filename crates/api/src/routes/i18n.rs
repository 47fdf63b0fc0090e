//! Language and translation management under `/api/i18n`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use domain::models::{
    CreateLanguageRequest, I18nEntry, Language, TranslationQuery, UpdateLanguageRequest,
    UpsertTranslationRequest,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::ApiResponse;

pub async fn list_languages(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Language>>, ApiError> {
    Ok(ApiResponse::ok(state.i18n().list_languages().await?))
}

pub async fn create_language(
    State(state): State<AppState>,
    payload: Result<Json<CreateLanguageRequest>, JsonRejection>,
) -> Result<ApiResponse<Language>, ApiError> {
    let Json(request) = payload?;
    let language = state.i18n().create_language(request).await?;

    tracing::info!(code = %language.code, is_default = language.is_default, "Language created");

    Ok(ApiResponse::created(language).with_message("Language created successfully"))
}

pub async fn update_language(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateLanguageRequest>, JsonRejection>,
) -> Result<ApiResponse<Language>, ApiError> {
    let Path(id) = path?;
    let Json(request) = payload?;
    let language = state.i18n().update_language(id, request).await?;
    Ok(ApiResponse::ok(language).with_message("Language updated successfully"))
}

pub async fn delete_language(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<()>, ApiError> {
    let Path(id) = path?;
    state.i18n().delete_language(id).await?;
    Ok(ApiResponse::message("Language deleted successfully"))
}

pub async fn list_content(
    State(state): State<AppState>,
    query: Result<Query<TranslationQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<I18nEntry>>, ApiError> {
    let Query(query) = query?;
    Ok(ApiResponse::ok(state.i18n().list_entries(&query).await?))
}

pub async fn upsert_content(
    State(state): State<AppState>,
    payload: Result<Json<UpsertTranslationRequest>, JsonRejection>,
) -> Result<ApiResponse<I18nEntry>, ApiError> {
    let Json(request) = payload?;
    let entry = state.i18n().upsert(request).await?;
    Ok(ApiResponse::created(entry).with_message("Translation saved successfully"))
}

pub async fn delete_content(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<ApiResponse<()>, ApiError> {
    let Path(id) = path?;
    state.i18n().delete_entry(id).await?;
    Ok(ApiResponse::message("Translation deleted successfully"))
}
