//! Sales tax by Canadian province.
//!
//! Rates are a fixed deployment-time table (HST where harmonized, combined
//! GST+PST otherwise, bare GST in the territories). Unknown codes fall back
//! to the Ontario rate rather than erroring: the store ships from Ontario
//! and an unrecognized province must never blank the checkout.

use rust_decimal::Decimal;

/// Fallback rate for unrecognized province codes (Ontario HST).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(13, 0, 0, false, 2);

/// Tax rate for a two-letter province code. Case-insensitive. Pure.
#[must_use]
pub fn tax_rate(province: &str) -> Decimal {
    match province.trim().to_ascii_uppercase().as_str() {
        "ON" => Decimal::from_parts(13, 0, 0, false, 2), // 0.13
        "NB" | "NL" | "NS" | "PE" => Decimal::from_parts(15, 0, 0, false, 2), // 0.15
        "QC" => Decimal::from_parts(14_975, 0, 0, false, 5), // 0.14975
        "BC" | "MB" => Decimal::from_parts(12, 0, 0, false, 2), // 0.12
        "SK" => Decimal::from_parts(11, 0, 0, false, 2),  // 0.11
        "AB" | "NT" | "NU" | "YT" => Decimal::from_parts(5, 0, 0, false, 2), // 0.05
        _ => DEFAULT_TAX_RATE,
    }
}

/// Tax owed on a taxable amount for the given province.
///
/// The taxable amount is the post-discount subtotal; rounding to cents is
/// left to the display layer.
#[must_use]
pub fn tax_amount(taxable: Decimal, province: &str) -> Decimal {
    taxable * tax_rate(province)
}
