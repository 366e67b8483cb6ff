//! Shipping zone resolution.
//!
//! Rules are evaluated in a fixed precedence order; the first match wins and
//! anything unmatched defers to live carrier rates. The zone logic only
//! decides free/flat/variable - fetching variable rates is the rate client's
//! job, and its unavailability must degrade to a "calculated at checkout"
//! display, never a blanked cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::address::Address;

/// Flat fee for deliveries inside Toronto proper.
pub const TORONTO_FLAT_RATE: Decimal = Decimal::from_parts(399, 0, 0, false, 2);

/// Post-discount subtotal at which GTA orders ship free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// How a shipping charge was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMode {
    Free,
    Flat,
    Variable,
}

/// Which rule matched, for display and for the loss report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingRuleReason {
    /// City matched Toronto; flat local-courier fee.
    TorontoFlat,
    /// GTA postal code with subtotal at or over the free threshold.
    GtaFreeThreshold,
    /// US destination; carrier rates apply and the customer sees a
    /// cross-border duties/tariff disclosure.
    CrossBorderUs,
    /// No zone rule matched; defer to live carrier rates.
    CarrierRates,
}

impl ShippingRuleReason {
    /// Whether the customer must be shown a cross-border charges notice.
    #[must_use]
    pub const fn requires_tariff_disclosure(self) -> bool {
        matches!(self, Self::CrossBorderUs)
    }
}

/// Resolved shipping decision for an address and subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingQuote {
    pub mode: ShippingMode,
    /// Charge in store currency; zero for `Free`, and zero for `Variable`
    /// until a carrier rate is selected.
    pub amount: Decimal,
    pub reason: ShippingRuleReason,
}

/// Whether the postal code falls in the Greater Toronto Area.
///
/// GTA forward sortation areas start with `M` (Toronto proper) or `L1`-`L9`
/// (the surrounding 905 belt).
#[must_use]
pub fn is_gta_postal_code(postal_code: &str) -> bool {
    let mut chars = postal_code.chars();
    match (chars.next(), chars.next()) {
        (Some('M'), _) => true,
        (Some('L'), Some(d)) => d.is_ascii_digit() && d != '0',
        _ => false,
    }
}

/// Resolve the shipping charge for an address and post-discount subtotal.
///
/// Precedence, first match wins:
/// 1. City containing "toronto" ships at [`TORONTO_FLAT_RATE`] regardless of
///    subtotal. This is a substring match on a free-text field and will also
///    match e.g. "New Toronto Heights"; that behavior is load-bearing for
///    existing orders and is kept intentionally (see DESIGN.md).
/// 2. GTA postal codes with subtotal >= [`FREE_SHIPPING_THRESHOLD`] ship free.
/// 3. US destinations use carrier rates with a tariff disclosure.
/// 4. Everything else uses carrier rates.
#[must_use]
pub fn resolve_shipping(address: &Address, subtotal_after_discount: Decimal) -> ShippingQuote {
    if address.city.to_lowercase().contains("toronto") {
        return ShippingQuote {
            mode: ShippingMode::Flat,
            amount: TORONTO_FLAT_RATE,
            reason: ShippingRuleReason::TorontoFlat,
        };
    }

    if is_gta_postal_code(&address.postal_code)
        && subtotal_after_discount >= FREE_SHIPPING_THRESHOLD
    {
        return ShippingQuote {
            mode: ShippingMode::Free,
            amount: Decimal::ZERO,
            reason: ShippingRuleReason::GtaFreeThreshold,
        };
    }

    if address.country == "US" {
        return ShippingQuote {
            mode: ShippingMode::Variable,
            amount: Decimal::ZERO,
            reason: ShippingRuleReason::CrossBorderUs,
        };
    }

    ShippingQuote {
        mode: ShippingMode::Variable,
        amount: Decimal::ZERO,
        reason: ShippingRuleReason::CarrierRates,
    }
}

/// Remaining spend before a GTA order ships free, clamped at zero.
///
/// `None` when the address can never qualify (non-GTA, or Toronto proper
/// where the flat rate always applies).
#[must_use]
pub fn free_shipping_gap(address: &Address, subtotal_after_discount: Decimal) -> Option<Decimal> {
    if address.city.to_lowercase().contains("toronto")
        || !is_gta_postal_code(&address.postal_code)
    {
        return None;
    }
    Some((FREE_SHIPPING_THRESHOLD - subtotal_after_discount).max(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(city: &str, postal: &str, country: &str) -> Address {
        Address {
            city: city.to_string(),
            postal_code: postal.to_string(),
            country: country.to_string(),
            province: "ON".to_string(),
            ..Address::default()
        }
    }

    #[test]
    fn test_toronto_flat_regardless_of_subtotal() {
        for subtotal in [Decimal::ZERO, Decimal::from(49), Decimal::from(500)] {
            let quote = resolve_shipping(&addr("Toronto", "M5T2L9", "CA"), subtotal);
            assert_eq!(quote.mode, ShippingMode::Flat);
            assert_eq!(quote.amount, TORONTO_FLAT_RATE);
            assert_eq!(quote.reason, ShippingRuleReason::TorontoFlat);
        }
    }

    #[test]
    fn test_toronto_match_is_case_insensitive_substring() {
        // Known quirk: any city containing "toronto" takes the flat rate,
        // including hypothetical names like this one.
        let quote = resolve_shipping(&addr("New Toronto Heights", "K1A0A1", "CA"), Decimal::ONE);
        assert_eq!(quote.mode, ShippingMode::Flat);
        let quote = resolve_shipping(&addr("TORONTO", "M4C1B5", "CA"), Decimal::ONE);
        assert_eq!(quote.mode, ShippingMode::Flat);
    }

    #[test]
    fn test_gta_free_at_threshold() {
        let quote = resolve_shipping(&addr("Oshawa", "L1H1A1", "CA"), Decimal::from(50));
        assert_eq!(quote.mode, ShippingMode::Free);
        assert_eq!(quote.amount, Decimal::ZERO);
        assert_eq!(quote.reason, ShippingRuleReason::GtaFreeThreshold);
    }

    #[test]
    fn test_gta_below_threshold_is_variable() {
        let quote = resolve_shipping(&addr("Oshawa", "L1H1A1", "CA"), Decimal::new(4_999, 2));
        assert_eq!(quote.mode, ShippingMode::Variable);
        assert_eq!(quote.reason, ShippingRuleReason::CarrierRates);
    }

    #[test]
    fn test_gta_postal_pattern() {
        assert!(is_gta_postal_code("M5V2T6"));
        assert!(is_gta_postal_code("L1H1A1"));
        assert!(is_gta_postal_code("L9W6X2"));
        assert!(!is_gta_postal_code("L0B1J0")); // L0 is rural, outside the belt
        assert!(!is_gta_postal_code("K1A0A1"));
        assert!(!is_gta_postal_code(""));
    }

    #[test]
    fn test_us_destination_flagged_for_tariff_disclosure() {
        let quote = resolve_shipping(&addr("Buffalo", "14201", "US"), Decimal::from(200));
        assert_eq!(quote.mode, ShippingMode::Variable);
        assert_eq!(quote.reason, ShippingRuleReason::CrossBorderUs);
        assert!(quote.reason.requires_tariff_disclosure());
    }

    #[test]
    fn test_elsewhere_defers_to_carrier() {
        let quote = resolve_shipping(&addr("Vancouver", "V6B1A1", "CA"), Decimal::from(200));
        assert_eq!(quote.mode, ShippingMode::Variable);
        assert_eq!(quote.reason, ShippingRuleReason::CarrierRates);
    }

    #[test]
    fn test_free_shipping_gap_counts_down_and_clamps() {
        let oshawa = addr("Oshawa", "L1H1A1", "CA");
        assert_eq!(
            free_shipping_gap(&oshawa, Decimal::from(40)),
            Some(Decimal::from(10))
        );
        assert_eq!(
            free_shipping_gap(&oshawa, Decimal::from(55)),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn test_free_shipping_gap_not_offered_outside_zone() {
        assert_eq!(
            free_shipping_gap(&addr("Ottawa", "K1A0A1", "CA"), Decimal::from(40)),
            None
        );
        // Toronto proper always pays the flat rate, so no progress bar.
        assert_eq!(
            free_shipping_gap(&addr("Toronto", "M5T2L9", "CA"), Decimal::from(40)),
            None
        );
    }
}
