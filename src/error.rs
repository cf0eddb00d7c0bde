//! API error taxonomy and the uniform error envelope
//!
//! Every failure leaves the service as `{"error": ..., "status_code": ...}`
//! with the same HTTP status. Not-found and validation faults keep their
//! message; anything else is logged and reported as a generic 500.

use std::any::Any;

use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub status_code: u16,
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::NotFound(msg) | ApiError::Validation(msg) => msg,
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "Unhandled error");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        envelope(status, message)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Render an envelope with a matching status
pub fn envelope(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorEnvelope {
            error: message.into(),
            status_code: status.as_u16(),
        }),
    )
        .into_response()
}

/// Fallback for unknown routes
pub async fn not_found_fallback() -> Response {
    envelope(StatusCode::NOT_FOUND, "Not Found")
}

/// Fallback for known routes hit with the wrong method
pub async fn method_not_allowed_fallback() -> Response {
    envelope(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

/// Convert a handler panic into the generic 500 envelope
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    envelope(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
}
