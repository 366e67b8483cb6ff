//! Order list, detail, and status transitions.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use kensington_core::{Order, OrderStatus};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for the orders list.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Status filter, e.g. `processing`.
    pub status: Option<String>,
    /// Created-at range start (inclusive).
    pub from: Option<NaiveDate>,
    /// Created-at range end (inclusive).
    pub to: Option<NaiveDate>,
}

/// One row in the orders table.
#[derive(Debug, Serialize)]
pub struct OrderListItem {
    pub id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub status: OrderStatus,
    pub customer_email: String,
    pub total: rust_decimal::Decimal,
    pub item_count: u32,
    /// Flags an order the loss report will have to exclude.
    pub missing_cost_data: bool,
}

impl From<&Order> for OrderListItem {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            created_at: order.created_at,
            status: order.status,
            customer_email: order.customer_email.clone(),
            total: order.total.rounded(),
            item_count: order.line_items.iter().map(|l| l.quantity).sum(),
            missing_cost_data: order.actual_shipping_cost.is_none(),
        }
    }
}

/// `GET /orders` - list with status and date filters.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Vec<OrderListItem>>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let orders = state.backend().list_orders(status, query.from, query.to).await?;
    Ok(Json(orders.iter().map(OrderListItem::from).collect()))
}

/// `GET /orders/{id}` - full order detail.
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    Ok(Json(state.backend().get_order(&id).await?))
}

/// Body for `POST /orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: OrderStatus,
}

/// Status change confirmation.
#[derive(Debug, Serialize)]
pub struct SetStatusResponse {
    pub id: String,
    pub status: OrderStatus,
}

/// `POST /orders/{id}/status` - operator-initiated transition.
///
/// The lifecycle is enforced here: an illegal move returns 400 and writes
/// nothing to the order store.
#[instrument(skip(state), fields(order_id = %id))]
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SetStatusRequest>,
) -> Result<Json<SetStatusResponse>> {
    let order = state.backend().get_order(&id).await?;
    let next = order.status.transition_to(body.status)?;
    state.backend().update_status(&id, next).await?;
    info!(from = %order.status, to = %next, "order status changed");
    Ok(Json(SetStatusResponse { id, status: next }))
}
