//! Shipment creation and tracking sync.

use axum::{
    Json,
    extract::{Path, State},
};
use kensington_core::{FulfillmentStatus, OrderStatus, Package};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::backend::FulfillmentUpdate;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Body for `POST /orders/{id}/shipment`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateShipmentRequest {
    /// Carrier service to purchase; carrier default when omitted.
    #[serde(default)]
    pub postage_type: Option<String>,
}

/// Created shipment summary.
#[derive(Debug, Serialize)]
pub struct ShipmentResponse {
    pub order_id: String,
    pub shipment_id: String,
    pub tracking_number: Option<String>,
    pub label_url: Option<String>,
    /// Carrier-billed postage, when reported; feeds the loss report.
    pub actual_shipping_cost: Option<rust_decimal::Decimal>,
}

/// `POST /orders/{id}/shipment` - create a carrier shipment and buy a label.
///
/// Persists the shipment id, tracking, label URL, and - when the carrier
/// reports it - the actual postage cost. A pending order moves to
/// processing.
#[instrument(skip(state), fields(order_id = %id))]
pub async fn create_shipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CreateShipmentRequest>,
) -> Result<Json<ShipmentResponse>> {
    let order = state.backend().get_order(&id).await?;
    if order.carrier_shipment_id.is_some() {
        return Err(AppError::BadRequest(format!(
            "order {id} already has a shipment"
        )));
    }

    let package = Package {
        item_count: order.line_items.iter().map(|l| l.quantity).sum(),
        weight_kg: None,
        declared_value: order.total.amount,
    };
    let shipment = state
        .stallion()
        .create_shipment(&order.shipping_address, package, body.postage_type)
        .await?;

    if shipment.postage_cost.is_none() {
        // The loss report will show this order as missing cost data until a
        // tracking sync fills it in.
        warn!(shipment_id = %shipment.id, "carrier did not report postage cost");
    }

    state
        .backend()
        .set_fulfillment(
            &id,
            &FulfillmentUpdate {
                stallion_shipment_id: shipment.id.clone(),
                tracking_number: shipment.tracking_number.clone(),
                shipping_label_url: shipment.label_url.clone(),
                fulfillment_status: fulfillment_status_str(FulfillmentStatus::LabelCreated),
                actual_shipping_cost: shipment.postage_cost,
            },
        )
        .await?;

    if order.status == OrderStatus::Pending {
        state
            .backend()
            .update_status(&id, order.status.transition_to(OrderStatus::Processing)?)
            .await?;
    }

    info!(shipment_id = %shipment.id, "shipment created");
    Ok(Json(ShipmentResponse {
        order_id: id,
        shipment_id: shipment.id,
        tracking_number: shipment.tracking_number,
        label_url: shipment.label_url,
        actual_shipping_cost: shipment.postage_cost,
    }))
}

/// `POST /orders/{id}/tracking/sync` - pull tracking and cost from the
/// carrier for an existing shipment.
#[instrument(skip(state), fields(order_id = %id))]
pub async fn sync_tracking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ShipmentResponse>> {
    let order = state.backend().get_order(&id).await?;
    let shipment_id = order
        .carrier_shipment_id
        .clone()
        .ok_or_else(|| AppError::BadRequest(format!("order {id} has no shipment")))?;

    let shipment = state.stallion().get_shipment(&shipment_id).await?;

    let fulfillment_status = match shipment.status.as_deref() {
        Some("delivered") => FulfillmentStatus::Delivered,
        Some("in_transit" | "shipped") => FulfillmentStatus::Shipped,
        _ => order.fulfillment_status,
    };

    state
        .backend()
        .set_fulfillment(
            &id,
            &FulfillmentUpdate {
                stallion_shipment_id: shipment_id.clone(),
                tracking_number: shipment.tracking_number.clone(),
                shipping_label_url: shipment.label_url.clone(),
                fulfillment_status: fulfillment_status_str(fulfillment_status),
                actual_shipping_cost: shipment.postage_cost,
            },
        )
        .await?;

    info!(shipment_id = %shipment_id, "tracking synced");
    Ok(Json(ShipmentResponse {
        order_id: id,
        shipment_id,
        tracking_number: shipment.tracking_number,
        label_url: shipment.label_url,
        actual_shipping_cost: shipment.postage_cost,
    }))
}

/// Store's snake_case spelling for a fulfillment status.
fn fulfillment_status_str(status: FulfillmentStatus) -> String {
    match status {
        FulfillmentStatus::Unfulfilled => "unfulfilled",
        FulfillmentStatus::LabelCreated => "label_created",
        FulfillmentStatus::Shipped => "shipped",
        FulfillmentStatus::Delivered => "delivered",
    }
    .to_string()
}
