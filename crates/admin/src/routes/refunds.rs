//! Refund creation.
//!
//! Validation happens against the live order before the refund function is
//! invoked: a request exceeding `total − already refunded` never leaves this
//! process.

use axum::{
    Json,
    extract::{Path, State},
};
use kensington_core::{RefundRequest, RefundType};
use serde::Serialize;
use tracing::{info, instrument};

use crate::backend::RefundCall;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Refund confirmation.
#[derive(Debug, Serialize)]
pub struct RefundResponse {
    pub order_id: String,
    pub amount: rust_decimal::Decimal,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `POST /orders/{id}/refunds` - validate, execute, record.
#[instrument(skip(state, body), fields(order_id = %id, amount = %body.amount.amount))]
pub async fn create(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RefundRequest>,
) -> Result<Json<RefundResponse>> {
    let order = state.backend().get_order(&id).await?;

    // Bound check first; nothing external happens for an invalid amount.
    body.validate(&order)?;

    let outcome = state
        .backend()
        .process_refund(&RefundCall {
            order_id: id.clone(),
            amount: body.amount.rounded(),
            reason: body.reason.clone(),
            notes: body.notes.clone(),
            refund_type: match body.refund_type {
                RefundType::Stripe => "stripe".to_string(),
                RefundType::Manual => "manual".to_string(),
            },
        })
        .await?;

    if !outcome.success {
        return Err(AppError::BadRequest(
            outcome
                .message
                .unwrap_or_else(|| "refund was not processed".to_string()),
        ));
    }

    info!(amount = %body.amount.amount, "refund processed");
    Ok(Json(RefundResponse {
        order_id: id,
        amount: body.amount.rounded(),
        success: true,
        message: outcome.message,
    }))
}
