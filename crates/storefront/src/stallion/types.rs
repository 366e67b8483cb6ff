//! Wire and domain types for the Stallion Express rate API.
//!
//! Wire types mirror the carrier's JSON exactly; the domain [`Rate`] is what
//! the rest of the storefront sees.

use kensington_core::{Address, CurrencyCode};
pub use kensington_core::Package;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Address fields in the carrier's dialect.
#[derive(Debug, Clone, Serialize)]
pub struct WireAddress {
    pub address1: String,
    pub city: String,
    pub province_code: String,
    pub postal_code: String,
    pub country_code: String,
}

impl From<&Address> for WireAddress {
    fn from(addr: &Address) -> Self {
        Self {
            address1: addr.line1.clone(),
            city: addr.city.clone(),
            province_code: addr.province.clone(),
            postal_code: addr.postal_code.clone(),
            country_code: addr.country.clone(),
        }
    }
}

/// Outbound rate request body.
#[derive(Debug, Clone, Serialize)]
pub struct RateRequest {
    pub from_address: WireAddress,
    pub to_address: WireAddress,
    pub weight: Decimal,
    pub weight_unit: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<WireDimensions>,
    pub declared_value: Decimal,
    pub currency: &'static str,
}

/// Package dimensions in centimetres.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WireDimensions {
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
}

/// One service level in the carrier's response.
#[derive(Debug, Clone, Deserialize)]
pub struct WireRate {
    pub postage_type: String,
    pub total: Decimal,
    #[serde(default)]
    pub delivery_days: Option<u32>,
}

/// Rate response body. A missing `rates` field means no rates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RateResponse {
    #[serde(default)]
    pub rates: Vec<WireRate>,
}

/// A carrier service level the customer can choose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    /// Carrier's identifier for the service level.
    pub carrier_service_id: String,
    /// Human-readable service name.
    pub display_name: String,
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub eta_days: Option<u32>,
}

impl From<WireRate> for Rate {
    fn from(wire: WireRate) -> Self {
        Self {
            display_name: display_name_for(&wire.postage_type),
            carrier_service_id: wire.postage_type,
            amount: wire.total,
            currency: CurrencyCode::CAD,
            eta_days: wire.delivery_days,
        }
    }
}

/// Turn a postage type slug into a customer-facing name,
/// e.g. `canada_post_expedited` -> `Canada Post Expedited`.
fn display_name_for(postage_type: &str) -> String {
    postage_type
        .split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A sorted rate list with a default selection.
///
/// The cheapest rate is auto-selected; the customer's explicit choice wins
/// when it names a returned service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSelection {
    /// Rates sorted ascending by amount.
    pub rates: Vec<Rate>,
    /// Service id of the selected rate.
    pub selected: Option<String>,
}

impl RateSelection {
    /// Sort rates ascending by amount and default-select the cheapest.
    #[must_use]
    pub fn from_rates(mut rates: Vec<Rate>) -> Self {
        rates.sort_by(|a, b| a.amount.cmp(&b.amount));
        let selected = rates.first().map(|r| r.carrier_service_id.clone());
        Self { rates, selected }
    }

    /// Honor the customer's choice if it names a returned service.
    pub fn select(&mut self, carrier_service_id: &str) -> bool {
        if self
            .rates
            .iter()
            .any(|r| r.carrier_service_id == carrier_service_id)
        {
            self.selected = Some(carrier_service_id.to_string());
            true
        } else {
            false
        }
    }

    /// The currently selected rate.
    #[must_use]
    pub fn selected_rate(&self) -> Option<&Rate> {
        let id = self.selected.as_deref()?;
        self.rates.iter().find(|r| r.carrier_service_id == id)
    }
}
