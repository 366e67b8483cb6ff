//! Physical package derived from cart or order contents.

use rust_decimal::Decimal;

/// Estimated weight per item when true product weight is unknown.
///
/// Placeholder heuristic, not a considered model: the catalog does not carry
/// per-product weights yet, so carrier quotes approximate.
pub const ESTIMATED_ITEM_WEIGHT_KG: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Floor for the package weight sent to the carrier.
pub const MIN_PACKAGE_WEIGHT_KG: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Shipment contents for rate quoting and shipment creation.
#[derive(Debug, Clone, Copy)]
pub struct Package {
    /// Number of items in the shipment.
    pub item_count: u32,
    /// True weight when known; estimated from `item_count` otherwise.
    pub weight_kg: Option<Decimal>,
    /// Declared value for customs/insurance.
    pub declared_value: Decimal,
}

impl Package {
    /// Weight to quote: actual if known, else the per-item estimate,
    /// floored at [`MIN_PACKAGE_WEIGHT_KG`].
    #[must_use]
    pub fn quotable_weight_kg(&self) -> Decimal {
        let weight = self
            .weight_kg
            .unwrap_or_else(|| ESTIMATED_ITEM_WEIGHT_KG * Decimal::from(self.item_count));
        weight.max(MIN_PACKAGE_WEIGHT_KG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_estimated_from_item_count() {
        let four_items = Package {
            item_count: 4,
            weight_kg: None,
            declared_value: Decimal::from(80),
        };
        assert_eq!(four_items.quotable_weight_kg(), Decimal::ONE); // 4 * 0.25
    }

    #[test]
    fn test_floor_applies_to_tiny_shipments() {
        let envelope = Package {
            item_count: 0,
            weight_kg: None,
            declared_value: Decimal::from(5),
        };
        assert_eq!(envelope.quotable_weight_kg(), MIN_PACKAGE_WEIGHT_KG);
    }

    #[test]
    fn test_known_weight_used_verbatim() {
        let known = Package {
            item_count: 4,
            weight_kg: Some(Decimal::new(32, 1)),
            declared_value: Decimal::from(80),
        };
        assert_eq!(known.quotable_weight_kg(), Decimal::new(32, 1));
    }
}
