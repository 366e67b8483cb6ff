//! Order economics: the rules that decide what a customer is charged.
//!
//! Every function here is pure. Configuration ([`DiscountPolicy`], zone
//! constants) is passed explicitly rather than read from ambient state, so
//! the cart drawer, the checkout page, and the back-office reports all price
//! from the same code and the same inputs.

pub mod discount;
pub mod reconciliation;
pub mod shipping;
pub mod tax;

pub use discount::DiscountPolicy;
pub use reconciliation::{ReconciliationReport, ZoneBreakdown, reconcile};
pub use shipping::{
    FREE_SHIPPING_THRESHOLD, ShippingMode, ShippingQuote, ShippingRuleReason, TORONTO_FLAT_RATE,
    free_shipping_gap, is_gta_postal_code, resolve_shipping,
};
pub use tax::{DEFAULT_TAX_RATE, tax_amount, tax_rate};
