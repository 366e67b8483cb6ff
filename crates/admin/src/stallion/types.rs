//! Wire types for Stallion shipment creation and tracking sync.

use kensington_core::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Address fields in the carrier's dialect.
#[derive(Debug, Clone, Serialize)]
pub struct WireAddress {
    pub name: String,
    pub address1: String,
    pub city: String,
    pub province_code: String,
    pub postal_code: String,
    pub country_code: String,
}

impl From<&Address> for WireAddress {
    fn from(addr: &Address) -> Self {
        Self {
            name: addr.name.clone().unwrap_or_default(),
            address1: addr.line1.clone(),
            city: addr.city.clone(),
            province_code: addr.province.clone(),
            postal_code: addr.postal_code.clone(),
            country_code: addr.country.clone(),
        }
    }
}

/// Outbound shipment creation body.
#[derive(Debug, Clone, Serialize)]
pub struct ShipmentRequest {
    pub to_address: WireAddress,
    pub weight: Decimal,
    pub weight_unit: &'static str,
    pub declared_value: Decimal,
    pub currency: &'static str,
    /// Carrier service to purchase; the carrier picks its default cheapest
    /// when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postage_type: Option<String>,
}

/// A created or synced shipment.
#[derive(Debug, Clone, Deserialize)]
pub struct Shipment {
    pub id: String,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub label_url: Option<String>,
    /// What the carrier billed for this shipment's postage.
    #[serde(default, alias = "total")]
    pub postage_cost: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipment_parses_with_aliased_cost() {
        let shipment: Shipment = serde_json::from_str(
            r#"{"id": "shp_9", "tracking_number": "SE123",
                "label_url": "https://labels.example/shp_9.pdf",
                "total": "11.20", "status": "ready"}"#,
        )
        .expect("parse");
        assert_eq!(shipment.postage_cost, Some(Decimal::new(1_120, 2)));
    }

    #[test]
    fn test_shipment_tolerates_missing_tracking() {
        // Tracking appears later, on sync; creation may omit it.
        let shipment: Shipment =
            serde_json::from_str(r#"{"id": "shp_9"}"#).expect("parse");
        assert_eq!(shipment.tracking_number, None);
        assert_eq!(shipment.postage_cost, None);
    }
}
