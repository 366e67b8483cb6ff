//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Errors in the pricing path never surface as blank pages: rate-fetch
//! failures degrade to a "calculated at checkout" state at the route layer,
//! and validation failures come back as field-level JSON the form can render
//! inline.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kensington_core::{AddressFieldError, CartError};
use serde_json::json;
use thiserror::Error;

use crate::services::checkout::CheckoutError;
use crate::stallion::StallionError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Carrier rate API operation failed.
    #[error("Stallion error: {0}")]
    Stallion(#[from] StallionError),

    /// Checkout-session creation failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Cart manipulation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Address failed validation; blocks only the submitting step.
    #[error("Address validation failed")]
    AddressValidation(Vec<AddressFieldError>),

    /// Session store failure.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

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
            Self::Stallion(_) | Self::Checkout(_) | Self::Session(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Stallion(_) | Self::Checkout(_) => StatusCode::BAD_GATEWAY,
            Self::Cart(CartError::LineNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Cart(CartError::ZeroQuantity)
            | Self::AddressValidation(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Session(_) | Self::Internal(_) => json!({
                "error": "Internal server error"
            }),
            // External-service failures are retryable; the client keeps its
            // cart/form state and shows a banner.
            Self::Stallion(_) => json!({
                "error": "Shipping rates are temporarily unavailable",
                "retryable": true
            }),
            Self::Checkout(_) => json!({
                "error": "Could not start checkout, please try again",
                "retryable": true
            }),
            Self::AddressValidation(errors) => json!({
                "error": "Please correct the highlighted fields",
                "fields": errors
            }),
            Self::Cart(err) => json!({ "error": err.to_string() }),
            Self::BadRequest(msg) => json!({ "error": msg }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
