// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::api_client::ApiErrorDetails;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Backend(#[from] ApiError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Structured error reported by the platform backend.
///
/// The API client itself never raises this; it folds failures into the
/// normalized response shape. Service-layer code that prefers `?` flow builds
/// one from the preserved envelope and is expected to catch it before the
/// result crosses back into a handler-visible `ServiceResult`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub status_code: u16,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub trace_id: Option<String>,
    pub timestamp: Option<String>,
}

impl ApiError {
    /// Build from a preserved backend error envelope.
    pub fn from_details(status_code: u16, details: ApiErrorDetails) -> Self {
        Self {
            status_code,
            code: details.code,
            message: details.message,
            details: details.details,
            trace_id: details.trace_id,
            timestamp: details.timestamp,
        }
    }

    /// Build from a plain failure message (transport errors, legacy envelopes).
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            code: "request_failed".to_string(),
            message: message.into(),
            details: None,
            trace_id: None,
            timestamp: None,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Backend(err) => {
                tracing::warn!(
                    code = %err.code,
                    trace_id = err.trace_id.as_deref().unwrap_or("-"),
                    "Backend error"
                );
                let status = StatusCode::from_u16(err.status_code)
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, "backend_error", Some(err.message.clone()))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
