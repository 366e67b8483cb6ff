//! Orders as seen by the back-office.
//!
//! An order is created by the payment provider's webhook once checkout
//! completes; everything after that point is operator-driven. Status never
//! changes on a timer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::shipping::ShippingMode;
use crate::types::address::Address;
use crate::types::money::{CurrencyCode, Money};

/// Attempted status transition not allowed by the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot move order from {from} to {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Payment/lifecycle status of an order.
///
/// Lifecycle: `pending → processing → completed`. `on_hold`, `cancelled`,
/// `refunded`, and `failed` are reachable from `pending`/`processing` by
/// explicit admin action; a `completed` order can only move to `refunded`.
/// All transitions are operator-initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    #[default]
    Pending,
    OnHold,
    Processing,
    Completed,
    Cancelled,
    Refunded,
    Failed,
}

impl OrderStatus {
    /// Whether an operator may move an order from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        if self == next {
            return false;
        }
        match self {
            Self::Pending => matches!(
                next,
                Self::Processing | Self::OnHold | Self::Cancelled | Self::Refunded | Self::Failed
            ),
            Self::Processing => matches!(
                next,
                Self::Completed | Self::OnHold | Self::Cancelled | Self::Refunded | Self::Failed
            ),
            // A held order resumes where it left off or is abandoned.
            Self::OnHold => matches!(next, Self::Processing | Self::Cancelled | Self::Refunded),
            Self::Completed => next == Self::Refunded,
            Self::Cancelled | Self::Refunded | Self::Failed => false,
        }
    }

    /// Validate a transition, returning the new status.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when the lifecycle forbids the move.
    pub fn transition_to(self, next: Self) -> Result<Self, InvalidTransition> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(InvalidTransition { from: self, to: next })
        }
    }

    /// Wire/display name in kebab-case.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::OnHold => "on-hold",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "on-hold" => Ok(Self::OnHold),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// Operational fulfillment state, tracked separately from payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    #[default]
    Unfulfilled,
    LabelCreated,
    Shipped,
    Delivered,
}

/// A purchased line on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
}

/// A completed checkout, as stored by the managed backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub fulfillment_status: FulfillmentStatus,
    pub line_items: Vec<OrderLineItem>,
    pub customer_email: String,
    pub shipping_address: Address,
    /// What the customer paid for shipping at checkout.
    pub charged_shipping: Money,
    /// What the carrier actually billed; absent until a shipment exists.
    pub actual_shipping_cost: Option<Money>,
    /// Which zone rule priced the shipping line, when known.
    pub shipping_mode: Option<ShippingMode>,
    pub tax_amount: Money,
    pub tax_rate: Decimal,
    pub total: Money,
    pub currency: CurrencyCode,
    pub tracking_number: Option<String>,
    /// Carrier-side shipment id (Stallion Express).
    pub carrier_shipment_id: Option<String>,
    pub shipping_label_url: Option<String>,
    /// Cumulative amount refunded so far.
    pub refund_amount: Decimal,
}

impl Order {
    /// Amount still refundable: `total − already refunded`.
    #[must_use]
    pub fn refundable_remainder(&self) -> Decimal {
        self.total.amount - self.refund_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Completed));
        assert_eq!(
            OrderStatus::Pending.transition_to(OrderStatus::Processing),
            Ok(OrderStatus::Processing)
        );
    }

    #[test]
    fn test_exception_states_reachable_from_open_orders() {
        for from in [OrderStatus::Pending, OrderStatus::Processing] {
            for to in [
                OrderStatus::OnHold,
                OrderStatus::Cancelled,
                OrderStatus::Refunded,
                OrderStatus::Failed,
            ] {
                assert!(from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_completed_only_admits_refunded() {
        assert!(OrderStatus::Completed.can_transition_to(OrderStatus::Refunded));
        for to in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::OnHold,
            OrderStatus::Cancelled,
            OrderStatus::Failed,
        ] {
            assert!(!OrderStatus::Completed.can_transition_to(to), "completed -> {to}");
        }
    }

    #[test]
    fn test_terminal_states_admit_nothing() {
        for from in [OrderStatus::Cancelled, OrderStatus::Refunded, OrderStatus::Failed] {
            for to in [
                OrderStatus::Pending,
                OrderStatus::Processing,
                OrderStatus::Completed,
                OrderStatus::Refunded,
            ] {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_self_transition_rejected() {
        let err = OrderStatus::Pending
            .transition_to(OrderStatus::Pending)
            .expect_err("self transition");
        assert_eq!(err.from, OrderStatus::Pending);
    }

    #[test]
    fn test_status_string_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::OnHold,
            OrderStatus::Processing,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
            OrderStatus::Refunded,
            OrderStatus::Failed,
        ] {
            let parsed: OrderStatus = status.as_str().parse().expect("parse");
            assert_eq!(parsed, status);
        }
    }
}
