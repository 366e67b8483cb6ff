//! HTTP client for the managed-backend order store and refund function.

use std::sync::Arc;

use chrono::NaiveDate;
use kensington_core::{Order, OrderStatus};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use crate::config::BackendConfig;

use super::BackendError;
use super::types::{FulfillmentUpdate, OrderRow, RefundCall, RefundOutcome};

/// Client for the managed backend's order store.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    api_url: String,
    refund_function_url: String,
    service_key: SecretString,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("api_url", &self.inner.api_url)
            .field("service_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &BackendConfig, refund_function_url: String) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.trim_end_matches('/').to_string(),
                refund_function_url,
                service_key: config.service_key.clone(),
            }),
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.inner
            .client
            .get(format!("{}{path}", self.inner.api_url))
            .bearer_auth(self.inner.service_key.expose_secret())
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status,
                body: body.chars().take(500).collect(),
            });
        }
        response
            .json()
            .await
            .map_err(|e| BackendError::Response(e.to_string()))
    }

    /// List orders, optionally filtered by status and created-at date range.
    ///
    /// Rows that fail normalization are returned as errors rather than
    /// silently skipped; a malformed order must be visible, not missing.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] on transport failure or malformed rows.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Order>, BackendError> {
        let mut request = self.get("/orders");
        if let Some(status) = status {
            request = request.query(&[("status", status.as_str())]);
        }
        if let Some(from) = from {
            request = request.query(&[("created_from", from.to_string())]);
        }
        if let Some(to) = to {
            request = request.query(&[("created_to", to.to_string())]);
        }

        let rows: Vec<OrderRow> = Self::read_json(request.send().await?).await?;
        debug!(count = rows.len(), "orders fetched");
        rows.into_iter().map(OrderRow::into_order).collect()
    }

    /// Fetch a single order.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] for unknown ids.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: &str) -> Result<Order, BackendError> {
        let response = self.get(&format!("/orders/{id}")).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(id.to_string()));
        }
        let row: OrderRow = Self::read_json(response).await?;
        row.into_order()
    }

    /// Persist an order status the state machine has already approved.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] on transport or API failure.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .patch(format!("{}/orders/{id}", self.inner.api_url))
            .bearer_auth(self.inner.service_key.expose_secret())
            .json(&serde_json::json!({ "status": status.as_str() }))
            .send()
            .await?;
        Self::read_json::<serde_json::Value>(response).await.map(|_| ())
    }

    /// Write fulfillment fields after a shipment is created or synced.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] on transport or API failure.
    #[instrument(skip(self, update), fields(shipment_id = %update.stallion_shipment_id))]
    pub async fn set_fulfillment(
        &self,
        id: &str,
        update: &FulfillmentUpdate,
    ) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .patch(format!("{}/orders/{id}", self.inner.api_url))
            .bearer_auth(self.inner.service_key.expose_secret())
            .json(update)
            .send()
            .await?;
        Self::read_json::<serde_json::Value>(response).await.map(|_| ())
    }

    /// Execute a refund through the refund edge function.
    ///
    /// Amount bounds are validated by the caller before this is reached.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] on transport or API failure.
    #[instrument(skip(self, call), fields(order_id = %call.order_id, amount = %call.amount))]
    pub async fn process_refund(&self, call: &RefundCall) -> Result<RefundOutcome, BackendError> {
        let response = self
            .inner
            .client
            .post(&self.inner.refund_function_url)
            .bearer_auth(self.inner.service_key.expose_secret())
            .json(call)
            .send()
            .await?;
        Self::read_json(response).await
    }
}
