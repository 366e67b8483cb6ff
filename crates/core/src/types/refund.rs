//! Refunds against completed checkouts.
//!
//! A refund is immutable once recorded. The cumulative refunded amount on an
//! order may never exceed the order total; the bound is checked here, before
//! any call leaves the process.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::money::Money;
use crate::types::order::Order;

/// Refund validation errors, reported before any external call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefundError {
    #[error("refund amount must be positive")]
    NonPositiveAmount,
    #[error("refund of {requested} exceeds refundable remainder {remaining}")]
    ExceedsRemainder {
        requested: Decimal,
        remaining: Decimal,
    },
    #[error("refund currency {requested} does not match order currency {order}")]
    CurrencyMismatch { requested: String, order: String },
}

/// How the refund is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundType {
    /// Issued through the payment provider.
    Stripe,
    /// Recorded only; money moved outside the system (e-transfer, cash).
    Manual,
}

/// An operator's request to refund part of an order.
#[derive(Debug, Clone, Deserialize)]
pub struct RefundRequest {
    pub amount: Money,
    pub reason: String,
    pub refund_type: RefundType,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RefundRequest {
    /// Validate this request against the order it targets.
    ///
    /// # Errors
    ///
    /// Rejects non-positive amounts, currency mismatches, and any amount
    /// exceeding `order.total − order.refund_amount`.
    pub fn validate(&self, order: &Order) -> Result<(), RefundError> {
        if !self.amount.is_positive() {
            return Err(RefundError::NonPositiveAmount);
        }
        if self.amount.currency != order.currency {
            return Err(RefundError::CurrencyMismatch {
                requested: self.amount.currency.to_string(),
                order: order.currency.to_string(),
            });
        }
        let remaining = order.refundable_remainder();
        if self.amount.amount > remaining {
            return Err(RefundError::ExceedsRemainder {
                requested: self.amount.amount,
                remaining,
            });
        }
        Ok(())
    }
}

/// A recorded refund. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refund {
    pub order_id: String,
    pub amount: Money,
    pub reason: String,
    pub refund_type: RefundType,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::types::address::Address;
    use crate::types::money::CurrencyCode;
    use crate::types::order::{FulfillmentStatus, OrderStatus};

    fn order(total: i64, refunded: i64) -> Order {
        Order {
            id: "ord_1".into(),
            created_at: Utc::now(),
            status: OrderStatus::Completed,
            fulfillment_status: FulfillmentStatus::Shipped,
            line_items: Vec::new(),
            customer_email: "c@example.com".into(),
            shipping_address: Address::default(),
            charged_shipping: Money::zero(),
            actual_shipping_cost: None,
            shipping_mode: None,
            tax_amount: Money::zero(),
            tax_rate: Decimal::ZERO,
            total: Money::cad(Decimal::new(total, 2)),
            currency: CurrencyCode::CAD,
            tracking_number: None,
            carrier_shipment_id: None,
            shipping_label_url: None,
            refund_amount: Decimal::new(refunded, 2),
        }
    }

    fn request(amount: i64) -> RefundRequest {
        RefundRequest {
            amount: Money::cad(Decimal::new(amount, 2)),
            reason: "damaged in transit".into(),
            refund_type: RefundType::Stripe,
            notes: None,
        }
    }

    #[test]
    fn test_full_refund_allowed() {
        assert!(request(10_000).validate(&order(10_000, 0)).is_ok());
    }

    #[test]
    fn test_over_refund_rejected() {
        let err = request(6_000)
            .validate(&order(10_000, 5_000))
            .expect_err("exceeds remainder");
        assert_eq!(
            err,
            RefundError::ExceedsRemainder {
                requested: Decimal::new(6_000, 2),
                remaining: Decimal::new(5_000, 2),
            }
        );
    }

    #[test]
    fn test_partial_refunds_accumulate_to_total() {
        // $50 already refunded on a $100 order leaves exactly $50.
        assert!(request(5_000).validate(&order(10_000, 5_000)).is_ok());
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert_eq!(
            request(0).validate(&order(10_000, 0)),
            Err(RefundError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_currency_mismatch_rejected() {
        let mut req = request(1_000);
        req.amount.currency = CurrencyCode::USD;
        assert!(matches!(
            req.validate(&order(10_000, 0)),
            Err(RefundError::CurrencyMismatch { .. })
        ));
    }
}
