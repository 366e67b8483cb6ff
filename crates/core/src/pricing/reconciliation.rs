//! Shipping-loss reconciliation.
//!
//! Post-hoc comparison of what customers were charged for shipping against
//! what the carrier actually billed. Read-only: the report is recomputed on
//! every query from the orders passed in and never mutates order state.
//!
//! Orders without carrier cost data cannot enter the loss math; they are
//! counted and listed explicitly so the operator can see how far the
//! aggregates may understate real loss.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::pricing::shipping::ShippingMode;
use crate::types::order::Order;

/// Per-order charged-vs-actual comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderShippingRow {
    pub order_id: String,
    pub charged: Decimal,
    /// `None` renders as a "No Cost Data" badge, never as zero.
    pub actual: Option<Decimal>,
    /// `actual − charged`; positive is a loss. `None` without cost data.
    pub difference: Option<Decimal>,
}

/// Aggregates over a set of orders sharing a zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ZoneBreakdown {
    pub order_count: usize,
    pub total_loss: Decimal,
    pub total_gain: Decimal,
    pub average_loss: Decimal,
    pub biggest_loss: Decimal,
}

/// The shipping-loss report for a queried set of orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconciliationReport {
    /// Orders with both charged and actual cost.
    pub orders_with_cost_data: usize,
    /// Orders excluded from loss math; surfaced, never silently dropped.
    pub missing_cost_data: usize,
    pub missing_cost_order_ids: Vec<String>,
    /// Σ difference where difference > 0.
    pub total_loss: Decimal,
    /// Σ |difference| where difference < 0.
    pub total_gain: Decimal,
    /// Mean of positive differences (0 when no order lost money).
    pub average_loss: Decimal,
    /// Largest single-order difference.
    pub biggest_loss: Decimal,
    /// Subset: orders granted free shipping by the GTA threshold rule.
    pub free_shipping_zone: ZoneBreakdown,
    /// Carrier cost absorbed on free-shipped orders (the rate forgone).
    pub total_discounts_given: Decimal,
    pub rows: Vec<OrderShippingRow>,
}

fn aggregate(differences: &[Decimal]) -> ZoneBreakdown {
    let losses: Vec<Decimal> = differences.iter().copied().filter(|d| *d > Decimal::ZERO).collect();
    let total_loss: Decimal = losses.iter().copied().sum();
    let total_gain: Decimal = differences
        .iter()
        .copied()
        .filter(|d| *d < Decimal::ZERO)
        .map(|d| -d)
        .sum();
    ZoneBreakdown {
        order_count: differences.len(),
        total_loss,
        total_gain,
        average_loss: if losses.is_empty() {
            Decimal::ZERO
        } else {
            total_loss / Decimal::from(losses.len())
        },
        biggest_loss: differences.iter().copied().max().unwrap_or_default(),
    }
}

/// Build the shipping-loss report over orders already filtered to the
/// requested date range.
#[must_use]
pub fn reconcile(orders: &[Order]) -> ReconciliationReport {
    let mut rows = Vec::with_capacity(orders.len());
    let mut differences = Vec::new();
    let mut zone_differences = Vec::new();
    let mut missing_ids = Vec::new();
    let mut total_discounts_given = Decimal::ZERO;

    for order in orders {
        let charged = order.charged_shipping.amount;
        let actual = order.actual_shipping_cost.map(|m| m.amount);
        let difference = actual.map(|a| a - charged);

        match difference {
            Some(diff) => {
                differences.push(diff);
                if order.shipping_mode == Some(ShippingMode::Free) {
                    zone_differences.push(diff);
                    // Free shipping charges nothing, so the whole carrier
                    // bill is subsidy.
                    if let Some(a) = actual {
                        total_discounts_given += a;
                    }
                }
            }
            None => missing_ids.push(order.id.clone()),
        }

        rows.push(OrderShippingRow {
            order_id: order.id.clone(),
            charged,
            actual,
            difference,
        });
    }

    let overall = aggregate(&differences);
    ReconciliationReport {
        orders_with_cost_data: differences.len(),
        missing_cost_data: missing_ids.len(),
        missing_cost_order_ids: missing_ids,
        total_loss: overall.total_loss,
        total_gain: overall.total_gain,
        average_loss: overall.average_loss,
        biggest_loss: overall.biggest_loss,
        free_shipping_zone: aggregate(&zone_differences),
        total_discounts_given,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::types::address::Address;
    use crate::types::money::{CurrencyCode, Money};
    use crate::types::order::{FulfillmentStatus, OrderStatus};

    fn order(
        id: &str,
        charged_cents: i64,
        actual_cents: Option<i64>,
        mode: Option<ShippingMode>,
    ) -> Order {
        Order {
            id: id.to_string(),
            created_at: Utc::now(),
            status: OrderStatus::Completed,
            fulfillment_status: FulfillmentStatus::Shipped,
            line_items: Vec::new(),
            customer_email: "c@example.com".into(),
            shipping_address: Address::default(),
            charged_shipping: Money::cad(Decimal::new(charged_cents, 2)),
            actual_shipping_cost: actual_cents.map(|c| Money::cad(Decimal::new(c, 2))),
            shipping_mode: mode,
            tax_amount: Money::zero(),
            tax_rate: Decimal::ZERO,
            total: Money::cad(Decimal::from(100)),
            currency: CurrencyCode::CAD,
            tracking_number: None,
            carrier_shipment_id: None,
            shipping_label_url: None,
            refund_amount: Decimal::ZERO,
        }
    }

    #[test]
    fn test_loss_and_gain_partition() {
        let orders = vec![
            // Charged 3.99, cost 12.50: loss of 8.51.
            order("a", 399, Some(1_250), Some(ShippingMode::Flat)),
            // Charged 15.00, cost 11.00: gain of 4.00.
            order("b", 1_500, Some(1_100), Some(ShippingMode::Variable)),
            // Free shipping, cost 9.25: loss of 9.25.
            order("c", 0, Some(925), Some(ShippingMode::Free)),
        ];
        let report = reconcile(&orders);

        assert_eq!(report.total_loss, Decimal::new(1_776, 2));
        assert_eq!(report.total_gain, Decimal::new(400, 2));
        assert_eq!(report.biggest_loss, Decimal::new(925, 2));

        // Sign partition: Σ difference == total_loss − total_gain.
        let sum: Decimal = report.rows.iter().filter_map(|r| r.difference).sum();
        assert_eq!(sum, report.total_loss - report.total_gain);
    }

    #[test]
    fn test_average_loss_is_mean_of_losses() {
        let orders = vec![
            order("a", 0, Some(1_000), Some(ShippingMode::Free)),
            order("b", 0, Some(500), Some(ShippingMode::Free)),
            order("c", 2_000, Some(1_000), Some(ShippingMode::Variable)), // gain
        ];
        let report = reconcile(&orders);
        assert_eq!(report.average_loss, Decimal::new(750, 2));
    }

    #[test]
    fn test_missing_cost_data_excluded_and_visible() {
        let orders = vec![
            order("a", 399, Some(1_250), Some(ShippingMode::Flat)),
            order("b", 399, None, Some(ShippingMode::Flat)),
        ];
        let report = reconcile(&orders);

        assert_eq!(report.orders_with_cost_data, 1);
        assert_eq!(report.missing_cost_data, 1);
        assert_eq!(report.missing_cost_order_ids, vec!["b".to_string()]);
        // The excluded order contributes nothing to the aggregates...
        assert_eq!(report.total_loss, Decimal::new(851, 2));
        // ...but still appears as a row, with no fabricated zero.
        let row = report.rows.iter().find(|r| r.order_id == "b").expect("row");
        assert_eq!(row.actual, None);
        assert_eq!(row.difference, None);
    }

    #[test]
    fn test_free_zone_subset_and_subsidy() {
        let orders = vec![
            order("a", 0, Some(925), Some(ShippingMode::Free)),
            order("b", 0, Some(875), Some(ShippingMode::Free)),
            order("c", 399, Some(1_250), Some(ShippingMode::Flat)),
        ];
        let report = reconcile(&orders);

        assert_eq!(report.free_shipping_zone.order_count, 2);
        assert_eq!(report.free_shipping_zone.total_loss, Decimal::new(1_800, 2));
        // Subsidy on free-shipped orders is the full carrier bill.
        assert_eq!(report.total_discounts_given, Decimal::new(1_800, 2));
    }

    #[test]
    fn test_empty_input_yields_zeroed_report() {
        let report = reconcile(&[]);
        assert_eq!(report, ReconciliationReport::default());
    }
}
