//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps publishing failures to HTTP status codes with a JSON `{error}`
//! body. Upstream pinning-service details are logged for operators but
//! never returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use metacert_pin::UploadError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// JSON error response body: `{"error": "<message>"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

/// Application-level error type for the upload surface.
#[derive(Error, Debug)]
pub enum AppError {
    /// The multipart request carried no file field (400).
    #[error("no file uploaded")]
    MissingFile,

    /// The multipart body could not be read (400).
    #[error("malformed multipart request: {0}")]
    Multipart(String),

    /// The pinning service failed or rejected the publish (500).
    /// Detail is logged, not returned.
    #[error("upstream pinning failure: {0}")]
    Upstream(#[from] UploadError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::MissingFile => (StatusCode::BAD_REQUEST, "No file uploaded".to_string()),
            Self::Multipart(reason) => (
                StatusCode::BAD_REQUEST,
                format!("Malformed upload request: {reason}"),
            ),
            Self::Upstream(_) => {
                tracing::error!(error = %self, "publish failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error uploading to pinning service".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
