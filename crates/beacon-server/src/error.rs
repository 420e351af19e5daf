//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

pub const FORWARD_FAILED: &str = "Failed to forward request to webhook";
pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Forwarding to webhook failed: {0}")]
    Forward(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Origin not allowed: {0}")]
    OriginNotAllowed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("{}", self);
        let message = match self {
            AppError::Forward(_) => FORWARD_FAILED,
            AppError::MalformedBody(_)
            | AppError::OriginNotAllowed(_)
            | AppError::Internal(_) => INTERNAL_ERROR,
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": message })),
        )
            .into_response()
    }
}

impl From<beacon_core::Error> for AppError {
    fn from(e: beacon_core::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}
