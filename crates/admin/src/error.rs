//! Unified error handling with Sentry integration.
//!
//! Mirrors the storefront: `AppError` captures server-class errors to Sentry
//! inside `IntoResponse` and maps everything to a client-safe JSON body.
//! Rule violations an operator can fix (bad transition, over-refund) come
//! back as 400s with the precise reason - they are the admin's inline
//! validation.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kensington_core::{InvalidTransition, RefundError};
use serde_json::json;
use thiserror::Error;

use crate::backend::BackendError;
use crate::stallion::StallionError;

/// Application-level error type for the admin.
#[derive(Debug, Error)]
pub enum AppError {
    /// Order store operation failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Carrier operation failed.
    #[error("Stallion error: {0}")]
    Stallion(#[from] StallionError),

    /// Refund rejected before any external call.
    #[error("Refund rejected: {0}")]
    Refund(#[from] RefundError),

    /// Status transition forbidden by the order lifecycle.
    #[error("{0}")]
    Transition(#[from] InvalidTransition),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Backend(_) | Self::Stallion(_) | Self::Internal(_)
        ) && !matches!(self, Self::Backend(BackendError::NotFound(_)))
        {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Backend(BackendError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Backend(_) | Self::Stallion(_) => StatusCode::BAD_GATEWAY,
            Self::Refund(_) | Self::Transition(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Backend(BackendError::NotFound(id)) => json!({
                "error": format!("order not found: {id}")
            }),
            Self::Backend(_) => json!({
                "error": "Order store unavailable",
                "retryable": true
            }),
            Self::Stallion(_) => json!({
                "error": "Carrier unavailable",
                "retryable": true
            }),
            Self::Refund(err) => json!({ "error": err.to_string() }),
            Self::Transition(err) => json!({ "error": err.to_string() }),
            Self::BadRequest(msg) => json!({ "error": msg }),
            Self::Internal(_) => json!({ "error": "Internal server error" }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
