//! Error handling for the bookshelf HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

/// Standard error response format for all HTTP errors
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: String,
    pub details: Vec<String>,
    pub trace_id: String,
    pub timestamp: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad request: {detail}")]
    BadRequest { detail: String },

    #[error("not found: {detail}")]
    NotFound { detail: String },

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("unprocessable: {detail}")]
    Unprocessable { detail: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a bad request error
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest {
            detail: detail.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
        }
    }

    /// Create an unprocessable error
    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::Unprocessable {
            detail: detail.into(),
        }
    }

    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message; always the bare reason phrase
    pub fn message(&self) -> &'static str {
        match self {
            AppError::BadRequest { .. } => "Bad Request",
            AppError::NotFound { .. } => "Not Found",
            AppError::MethodNotAllowed => "Method Not Allowed",
            AppError::Unprocessable { .. } => "Unprocessable",
            AppError::Internal(_) => "Internal Server Error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let trace_id = Uuid::now_v7();
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(
                trace_id = %trace_id,
                status_code = %status.as_u16(),
                error = %self,
                "request failed"
            );
        } else {
            tracing::warn!(
                trace_id = %trace_id,
                status_code = %status.as_u16(),
                error = %self,
                "request rejected"
            );
        }

        let details = match self {
            AppError::BadRequest { detail }
            | AppError::NotFound { detail }
            | AppError::Unprocessable { detail } => vec![detail],
            AppError::MethodNotAllowed => Vec::new(),
            // Internal error details stay in the logs for release builds
            AppError::Internal(e) if cfg!(debug_assertions) => vec![format!("{e:#}")],
            AppError::Internal(_) => Vec::new(),
        };

        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: message.to_string(),
            details,
            trace_id: trace_id.to_string(),
            timestamp,
        };

        (status, Json(body)).into_response()
    }
}

/// Fallback handler for unknown paths
pub async fn not_found() -> AppError {
    AppError::not_found("no route matches the requested path")
}

/// Fallback handler for unsupported methods on known paths
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            AppError::unprocessable("x").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_internal_error_mapping() {
        let internal_error = anyhow::anyhow!("Database connection failed");
        let response = AppError::Internal(internal_error).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_error_response_format() {
        let response = AppError::not_found("page 9 is empty").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], 404);
        assert_eq!(body["message"], "Not Found");
        assert_eq!(body["details"][0], "page 9 is empty");
        assert!(Uuid::parse_str(body["trace_id"].as_str().unwrap()).is_ok());
        assert!(body["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_method_not_allowed_body() {
        let body = body_json(method_not_allowed().await.into_response()).await;
        assert_eq!(body["error"], 405);
        assert_eq!(body["message"], "Method Not Allowed");
        assert_eq!(body["details"], serde_json::json!([]));
    }
}
