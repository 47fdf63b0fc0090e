//! Component catalog.

use axum::extract::State;
use domain::models::ComponentDefinition;

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::ApiResponse;

pub async fn list_catalog(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<ComponentDefinition>>, ApiError> {
    Ok(ApiResponse::ok(state.pages().list_catalog().await?))
}
