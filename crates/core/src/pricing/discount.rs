//! Store-wide percentage discount.
//!
//! The policy is administrator-managed configuration, loaded once and passed
//! into pricing calls explicitly. Both the cart drawer and the checkout page
//! price through the same policy value, which keeps their displayed totals
//! consistent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid discount configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("discount percentage {0} is outside 0-100")]
pub struct InvalidPercentage(pub Decimal);

/// Store-wide discount configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountPolicy {
    pub enabled: bool,
    /// Customer-facing label, e.g. "Grand Opening Sale".
    pub name: String,
    /// Percentage off, 0-100.
    percentage: Decimal,
}

impl DiscountPolicy {
    /// Create a policy, validating the percentage range.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPercentage`] when `percentage` is outside 0-100.
    pub fn new(
        enabled: bool,
        name: impl Into<String>,
        percentage: Decimal,
    ) -> Result<Self, InvalidPercentage> {
        if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
            return Err(InvalidPercentage(percentage));
        }
        Ok(Self {
            enabled,
            name: name.into(),
            percentage,
        })
    }

    /// A disabled policy; `apply` is the identity.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            name: String::new(),
            percentage: Decimal::ZERO,
        }
    }

    #[must_use]
    pub const fn percentage(&self) -> Decimal {
        self.percentage
    }

    /// Amount after discount. Identity when disabled.
    ///
    /// Full-precision result; round only at display so
    /// `apply(x) + discount_amount(x) == x` holds exactly.
    #[must_use]
    pub fn apply(&self, amount: Decimal) -> Decimal {
        if !self.enabled {
            return amount;
        }
        amount * (Decimal::ONE - self.percentage / Decimal::ONE_HUNDRED)
    }

    /// Amount taken off. Zero when disabled.
    #[must_use]
    pub fn discount_amount(&self, amount: Decimal) -> Decimal {
        amount - self.apply(amount)
    }
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twenty_percent() -> DiscountPolicy {
        DiscountPolicy::new(true, "Sale", Decimal::from(20)).expect("valid")
    }

    #[test]
    fn test_disabled_is_identity() {
        let policy = DiscountPolicy::disabled();
        let x = Decimal::new(12_345, 2);
        assert_eq!(policy.apply(x), x);
        assert_eq!(policy.discount_amount(x), Decimal::ZERO);
    }

    #[test]
    fn test_twenty_percent_off_hundred() {
        let policy = twenty_percent();
        let hundred = Decimal::ONE_HUNDRED;
        assert_eq!(policy.apply(hundred), Decimal::from(80));
        assert_eq!(policy.discount_amount(hundred), Decimal::from(20));
    }

    #[test]
    fn test_split_reassembles_exactly() {
        // apply(x) + discount_amount(x) == x for awkward amounts too.
        for (pct, cents) in [(7i64, 1_999i64), (33, 4_242), (50, 1), (100, 9_999), (0, 777)] {
            let policy =
                DiscountPolicy::new(true, "t", Decimal::from(pct)).expect("valid percentage");
            let x = Decimal::new(cents, 2);
            assert_eq!(
                policy.apply(x) + policy.discount_amount(x),
                x,
                "pct={pct} x={x}"
            );
        }
    }

    #[test]
    fn test_percentage_bounds_enforced() {
        assert!(DiscountPolicy::new(true, "t", Decimal::from(101)).is_err());
        assert!(DiscountPolicy::new(true, "t", Decimal::from(-1)).is_err());
        assert!(DiscountPolicy::new(true, "t", Decimal::ONE_HUNDRED).is_ok());
    }
}
