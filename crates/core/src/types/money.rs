//! Monetary amounts backed by decimal arithmetic.
//!
//! All intermediate pricing math stays in full `Decimal` precision; rounding
//! to cents happens only when an amount is formatted or serialized for
//! display. Rounding intermediate values compounds error across the
//! discount/tax/shipping pipeline.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes accepted by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    CAD,
    USD,
}

impl CurrencyCode {
    /// Three-letter ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::CAD => "CAD",
            Self::USD => "USD",
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CAD" => Ok(Self::CAD),
            "USD" => Ok(Self::USD),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}

/// A monetary amount with its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Canadian dollars.
    #[must_use]
    pub const fn cad(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::CAD)
    }

    /// Zero in Canadian dollars.
    #[must_use]
    pub fn zero() -> Self {
        Self::cad(Decimal::ZERO)
    }

    /// Amount rounded to cents for display or outbound serialization.
    #[must_use]
    pub fn rounded(self) -> Decimal {
        self.amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Format as a display price, e.g. `$19.99 CAD`.
    #[must_use]
    pub fn display(self) -> String {
        format!("${:.2} {}", self.rounded(), self.currency)
    }

    /// Whether this amount is strictly positive.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.amount > Decimal::ZERO
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}
