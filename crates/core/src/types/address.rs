//! Canonical shipping addresses.
//!
//! Addresses arrive from two upstream dialects (the checkout form posts
//! `address`/`province`/`postal_code`, the order store returns
//! `address_1`/`state`/`zip`). [`RawAddress`] accepts both via serde aliases
//! and [`RawAddress::normalize`] produces the single [`Address`] used by all
//! business logic, so zone matching never branches on wire shape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A field-level validation problem, reportable inline next to the input.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum AddressFieldError {
    #[error("city is required")]
    MissingCity,
    #[error("province is required")]
    MissingProvince,
    #[error("country is required")]
    MissingCountry,
    #[error("postal code is required")]
    MissingPostalCode,
    #[error("postal code {0:?} is not a valid Canadian postal code")]
    MalformedPostalCode(String),
}

/// Incoming address in either upstream naming convention.
///
/// Only used at ingress; call [`Self::normalize`] immediately.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAddress {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "address", alias = "address_1", alias = "line1")]
    pub address1: Option<String>,
    #[serde(default, alias = "address_2", alias = "line2")]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, alias = "state", alias = "province_code")]
    pub province: Option<String>,
    #[serde(default, alias = "country_code")]
    pub country: Option<String>,
    #[serde(default, alias = "zip", alias = "postal")]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl RawAddress {
    /// Normalize into the canonical [`Address`].
    ///
    /// Trims whitespace, uppercases province/country/postal code, and
    /// defaults the country to `CA` when absent (the store's home market).
    #[must_use]
    pub fn normalize(self) -> Address {
        let clean = |s: Option<String>| {
            s.map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_default()
        };
        let clean_opt = |s: Option<String>| {
            s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };

        let country = {
            let c = clean(self.country).to_ascii_uppercase();
            if c.is_empty() { "CA".to_string() } else { c }
        };

        Address {
            name: clean_opt(self.name),
            line1: clean(self.address1),
            line2: clean_opt(self.address2),
            city: clean(self.city),
            province: clean(self.province).to_ascii_uppercase(),
            country,
            postal_code: clean(self.postal_code)
                .to_ascii_uppercase()
                .split_whitespace()
                .collect(),
            phone: clean_opt(self.phone),
        }
    }
}

/// Canonical shipping address.
///
/// Province and country are uppercase codes; the postal code is uppercase
/// with internal whitespace removed, so `m5v 2t6` and `M5V2T6` compare equal
/// for zone matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub name: Option<String>,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    /// Two-letter province/state code, uppercase.
    pub province: String,
    /// ISO-2 country code, uppercase.
    pub country: String,
    /// Uppercase postal code, whitespace stripped.
    pub postal_code: String,
    pub phone: Option<String>,
}

impl Address {
    /// Whether this is a Canadian address.
    #[must_use]
    pub fn is_canadian(&self) -> bool {
        self.country == "CA"
    }

    /// Key identifying the address for rate-quote deduplication.
    ///
    /// Two addresses with the same key would receive identical carrier
    /// quotes, so re-fetching for the same key is redundant.
    #[must_use]
    pub fn rate_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.country,
            self.province,
            self.city.to_ascii_lowercase(),
            self.postal_code
        )
    }

    /// Validate fields required before payment submission.
    ///
    /// Returns every problem found, not just the first, so the checkout can
    /// annotate each field inline.
    ///
    /// # Errors
    ///
    /// Returns all [`AddressFieldError`]s for missing or malformed fields.
    pub fn validate(&self) -> Result<(), Vec<AddressFieldError>> {
        let mut errors = Vec::new();
        if self.city.is_empty() {
            errors.push(AddressFieldError::MissingCity);
        }
        if self.province.is_empty() {
            errors.push(AddressFieldError::MissingProvince);
        }
        if self.country.is_empty() {
            errors.push(AddressFieldError::MissingCountry);
        }
        if self.postal_code.is_empty() {
            errors.push(AddressFieldError::MissingPostalCode);
        } else if self.is_canadian() && !is_canadian_postal_code(&self.postal_code) {
            errors.push(AddressFieldError::MalformedPostalCode(
                self.postal_code.clone(),
            ));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Check the `A1A1A1` shape of a (whitespace-stripped) Canadian postal code.
fn is_canadian_postal_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 6
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i % 2 == 0 { b.is_ascii_uppercase() } else { b.is_ascii_digit() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> Address {
        serde_json::from_str::<RawAddress>(json)
            .expect("valid json")
            .normalize()
    }

    #[test]
    fn test_normalizes_checkout_form_dialect() {
        let addr = raw(
            r#"{"address": "290 Augusta Ave", "city": " Toronto ", "province": "on",
                "country": "ca", "postal_code": "m5t 2l9"}"#,
        );
        assert_eq!(addr.line1, "290 Augusta Ave");
        assert_eq!(addr.city, "Toronto");
        assert_eq!(addr.province, "ON");
        assert_eq!(addr.country, "CA");
        assert_eq!(addr.postal_code, "M5T2L9");
    }

    #[test]
    fn test_normalizes_order_store_dialect() {
        let addr = raw(
            r#"{"address_1": "1 Main St", "city": "Oshawa", "state": "ON",
                "zip": "L1H 1A1"}"#,
        );
        assert_eq!(addr.line1, "1 Main St");
        assert_eq!(addr.province, "ON");
        // Country defaults to the home market when the store omits it.
        assert_eq!(addr.country, "CA");
        assert_eq!(addr.postal_code, "L1H1A1");
    }

    #[test]
    fn test_rate_key_is_case_insensitive_on_city() {
        let a = raw(r#"{"city": "Toronto", "province": "ON", "postal_code": "M5T2L9"}"#);
        let b = raw(r#"{"city": "TORONTO", "province": "on", "postal_code": "m5t 2l9"}"#);
        assert_eq!(a.rate_key(), b.rate_key());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let addr = Address::default();
        let errors = addr.validate().expect_err("empty address must fail");
        assert!(errors.contains(&AddressFieldError::MissingCity));
        assert!(errors.contains(&AddressFieldError::MissingProvince));
        assert!(errors.contains(&AddressFieldError::MissingPostalCode));
    }

    #[test]
    fn test_validate_rejects_malformed_canadian_postal_code() {
        let addr = raw(r#"{"city": "Toronto", "province": "ON", "postal_code": "12345"}"#);
        let errors = addr.validate().expect_err("bad postal code");
        assert_eq!(
            errors,
            vec![AddressFieldError::MalformedPostalCode("12345".into())]
        );
    }

    #[test]
    fn test_validate_accepts_us_zip() {
        let addr = raw(
            r#"{"city": "Buffalo", "province": "NY", "country": "US",
                "postal_code": "14201"}"#,
        );
        assert!(addr.validate().is_ok());
    }
}
