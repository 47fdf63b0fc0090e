//! HTTP route handlers.

pub mod components;
pub mod health;
pub mod i18n;
pub mod pages;
pub mod public;
pub mod redirects;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::pagination::Pagination;

/// Success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            pagination: None,
            message: None,
            status: StatusCode::OK,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::ok(data)
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::ok(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// Envelope for mutations with nothing to return.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            pagination: None,
            message: Some(message.into()),
            status: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn body(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ok_envelope() {
        let (status, json) = body(ApiResponse::ok(vec![1, 2]).into_response()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"success": true, "data": [1, 2]}));
    }

    #[tokio::test]
    async fn test_created_with_message() {
        let response = ApiResponse::created("x")
            .with_message("Page created successfully")
            .into_response();
        let (status, json) = body(response).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["message"], "Page created successfully");
    }

    #[tokio::test]
    async fn test_paginated_envelope() {
        let pagination = Pagination {
            page: 1,
            limit: 20,
            total: 1,
            total_pages: 1,
        };
        let (_, json) = body(ApiResponse::paginated(vec!["a"], pagination).into_response()).await;
        assert_eq!(json["pagination"]["total"], 1);
        assert_eq!(json["data"][0], "a");
    }

    #[tokio::test]
    async fn test_message_only() {
        let (_, json) = body(ApiResponse::message("Page deleted successfully").into_response()).await;
        assert_eq!(
            json,
            json!({"success": true, "message": "Page deleted successfully"})
        );
    }
}
