//! Wire types for the managed-backend order store.
//!
//! Field names here mirror the store's columns verbatim; all normalization
//! into domain types happens in [`OrderRow::into_order`] so the rest of the
//! admin never branches on upstream naming.

use chrono::{DateTime, Utc};
use kensington_core::{
    CurrencyCode, FulfillmentStatus, Money, Order, OrderLineItem, OrderStatus, RawAddress,
    ShippingMode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::BackendError;

/// A stored line item: `line_items[{quantity, price}]` plus a display name.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemRow {
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
}

/// An order row exactly as the store returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRow {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
    #[serde(default)]
    pub fulfillment_status: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItemRow>,
    #[serde(alias = "email")]
    pub customer_email: String,
    /// Nested address object in the store's dialect.
    pub shipping_address: RawAddress,
    /// What the customer was charged for shipping.
    #[serde(alias = "shipping")]
    pub charged_shipping: Decimal,
    /// Carrier-billed cost, populated once a shipment exists or syncs.
    #[serde(default)]
    pub actual_shipping_cost: Option<Decimal>,
    #[serde(default)]
    pub shipping_mode: Option<String>,
    pub tax: Decimal,
    #[serde(default)]
    pub tax_rate: Decimal,
    pub total: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub stallion_shipment_id: Option<String>,
    #[serde(default)]
    pub shipping_label_url: Option<String>,
    /// Cumulative refunded amount.
    #[serde(default)]
    pub refund_amount: Decimal,
}

impl OrderRow {
    /// Normalize into the canonical [`Order`].
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::MalformedOrder`] for unknown status values;
    /// unknown shipping modes degrade to `None` (they only gate reporting,
    /// not money movement).
    pub fn into_order(self) -> Result<Order, BackendError> {
        let status: OrderStatus =
            self.status
                .parse()
                .map_err(|reason| BackendError::MalformedOrder {
                    id: self.id.clone(),
                    reason,
                })?;

        let fulfillment_status = match self.fulfillment_status.as_deref() {
            None | Some("unfulfilled") => FulfillmentStatus::Unfulfilled,
            Some("label_created") => FulfillmentStatus::LabelCreated,
            Some("shipped") => FulfillmentStatus::Shipped,
            Some("delivered") => FulfillmentStatus::Delivered,
            Some(other) => {
                return Err(BackendError::MalformedOrder {
                    id: self.id,
                    reason: format!("unknown fulfillment status: {other}"),
                });
            }
        };

        let currency = self
            .currency
            .as_deref()
            .unwrap_or("CAD")
            .parse::<CurrencyCode>()
            .map_err(|reason| BackendError::MalformedOrder {
                id: self.id.clone(),
                reason,
            })?;

        let shipping_mode = match self.shipping_mode.as_deref() {
            Some("free") => Some(ShippingMode::Free),
            Some("flat") => Some(ShippingMode::Flat),
            Some("variable") => Some(ShippingMode::Variable),
            _ => None,
        };

        Ok(Order {
            id: self.id,
            created_at: self.created_at,
            status,
            fulfillment_status,
            line_items: self
                .line_items
                .into_iter()
                .map(|l| OrderLineItem {
                    name: l.name,
                    quantity: l.quantity,
                    price: l.price,
                })
                .collect(),
            customer_email: self.customer_email,
            shipping_address: self.shipping_address.normalize(),
            charged_shipping: Money::new(self.charged_shipping, currency),
            actual_shipping_cost: self
                .actual_shipping_cost
                .map(|amount| Money::new(amount, currency)),
            shipping_mode,
            tax_amount: Money::new(self.tax, currency),
            tax_rate: self.tax_rate,
            total: Money::new(self.total, currency),
            currency,
            tracking_number: self.tracking_number,
            carrier_shipment_id: self.stallion_shipment_id,
            shipping_label_url: self.shipping_label_url,
            refund_amount: self.refund_amount,
        })
    }
}

/// Fulfillment fields written back after a shipment is created or synced.
#[derive(Debug, Clone, Serialize)]
pub struct FulfillmentUpdate {
    pub stallion_shipment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_label_url: Option<String>,
    pub fulfillment_status: String,
    /// Carrier-billed cost, when the carrier reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_shipping_cost: Option<Decimal>,
}

/// Request contract for the refund edge function.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundCall {
    pub order_id: String,
    pub amount: Decimal,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub refund_type: String,
}

/// Response from the refund edge function.
#[derive(Debug, Clone, Deserialize)]
pub struct RefundOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
