use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("A scan is already running")]
    ScanInProgress,

    #[error("No scan has completed yet")]
    NoReport,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid(e: impl std::fmt::Display) -> Self {
        ApiError::InvalidRequest(format!("{:#}", e))
    }

    pub fn internal(e: impl std::fmt::Display) -> Self {
        ApiError::Internal(format!("{:#}", e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::ScanInProgress => (StatusCode::CONFLICT, "SCAN_IN_PROGRESS"),
            ApiError::NoReport => (StatusCode::NOT_FOUND, "NO_REPORT"),
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = json!({
            "success": false,
            "error": { "code": code, "message": self.to_string() }
        });
        (status, Json(body)).into_response()
    }
}
