//! API errors rendered as `{success: false, error, fallback?}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use portflow::{Fallback, GatewayError};
use serde::Serialize;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Fallback>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// The submitted file could not be analyzed; carries a placeholder
    #[error("{0}")]
    AnalysisFailed(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::AnalysisFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let fallback = matches!(self, ApiError::AnalysisFailed(_)).then(|| Fallback {
            title: "Analysis Failed".to_string(),
            description: "This file could not be analyzed due to a technical error".to_string(),
        });
        if status.is_server_error() {
            tracing::warn!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            success: false,
            error: self.to_string(),
            fallback,
        };
        (status, Json(body)).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound { slug } => ApiError::NotFound(format!("Portfolio not found: {slug}")),
            GatewayError::PersistenceUnavailable(e) => ApiError::Unavailable(format!("Portfolio storage unavailable: {e}")),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}
