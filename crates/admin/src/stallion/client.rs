//! Stallion Express HTTP client (shipments).

use std::sync::Arc;

use kensington_core::{Address, Package};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use crate::config::StallionConfig;

use super::StallionError;
use super::types::{Shipment, ShipmentRequest, WireAddress};

/// Client for Stallion Express shipment operations.
#[derive(Clone)]
pub struct StallionClient {
    inner: Arc<StallionClientInner>,
}

struct StallionClientInner {
    client: reqwest::Client,
    api_url: String,
    api_key: SecretString,
}

impl std::fmt::Debug for StallionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StallionClient")
            .field("api_url", &self.inner.api_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl StallionClient {
    /// Create a new Stallion client.
    #[must_use]
    pub fn new(config: &StallionConfig) -> Self {
        Self {
            inner: Arc::new(StallionClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.trim_end_matches('/').to_string(),
                api_key: config.api_key.clone(),
            }),
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StallionError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StallionError::Api {
                status,
                body: body.chars().take(500).collect(),
            });
        }
        response
            .json()
            .await
            .map_err(|e| StallionError::Response(e.to_string()))
    }

    /// Create a shipment and purchase a label.
    ///
    /// # Errors
    ///
    /// Returns [`StallionError`] on transport or API failure.
    #[instrument(skip(self, package), fields(to = %to.rate_key()))]
    pub async fn create_shipment(
        &self,
        to: &Address,
        package: Package,
        postage_type: Option<String>,
    ) -> Result<Shipment, StallionError> {
        let body = ShipmentRequest {
            to_address: WireAddress::from(to),
            weight: package.quotable_weight_kg(),
            weight_unit: "kg",
            declared_value: package.declared_value,
            currency: "CAD",
            postage_type,
        };

        let response = self
            .inner
            .client
            .post(format!("{}/shipments", self.inner.api_url))
            .bearer_auth(self.inner.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let shipment: Shipment = Self::read_json(response).await?;
        debug!(shipment_id = %shipment.id, "shipment created");
        Ok(shipment)
    }

    /// Fetch a shipment's current tracking and cost state.
    ///
    /// # Errors
    ///
    /// Returns [`StallionError`] on transport or API failure.
    #[instrument(skip(self))]
    pub async fn get_shipment(&self, shipment_id: &str) -> Result<Shipment, StallionError> {
        let response = self
            .inner
            .client
            .get(format!("{}/shipments/{shipment_id}", self.inner.api_url))
            .bearer_auth(self.inner.api_key.expose_secret())
            .send()
            .await?;
        Self::read_json(response).await
    }
}
