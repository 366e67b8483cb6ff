//! Stallion Express HTTP client.

use std::sync::Arc;
use std::time::Duration;

use kensington_core::Address;
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};

use crate::config::StallionConfig;

use super::StallionError;
use super::types::{Package, Rate, RateRequest, RateResponse, WireAddress};

/// How long a rate quote stays valid for an unchanged address.
const RATE_CACHE_TTL: Duration = Duration::from_secs(120);

/// Client for the Stallion Express rate API.
///
/// Rate quotes are cached briefly per destination key so repeated renders of
/// the same checkout do not re-query the carrier.
#[derive(Clone)]
pub struct StallionClient {
    inner: Arc<StallionClientInner>,
}

struct StallionClientInner {
    client: reqwest::Client,
    api_url: String,
    api_key: SecretString,
    cache: Cache<String, Vec<Rate>>,
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
        let cache = Cache::builder()
            .max_capacity(500)
            .time_to_live(RATE_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(StallionClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.trim_end_matches('/').to_string(),
                api_key: config.api_key.clone(),
                cache,
            }),
        }
    }

    /// Fetch rates for a shipment, sorted ascending by amount.
    ///
    /// Zero rates is not an error here: the response resolves to an empty
    /// list and the caller surfaces a retryable "no rates" state. Only
    /// transport and API failures return `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`StallionError`] when the request cannot be sent or the API
    /// answers with a non-success status.
    #[instrument(skip(self, package), fields(to = %to.rate_key()))]
    pub async fn get_rates(
        &self,
        from: &Address,
        to: &Address,
        package: Package,
    ) -> Result<Vec<Rate>, StallionError> {
        let cache_key = to.rate_key();
        if let Some(cached) = self.inner.cache.get(&cache_key).await {
            debug!("rate cache hit");
            return Ok(cached);
        }

        let body = RateRequest {
            from_address: WireAddress::from(from),
            to_address: WireAddress::from(to),
            weight: package.quotable_weight_kg(),
            weight_unit: "kg",
            dimensions: None,
            declared_value: package.declared_value,
            currency: "CAD",
        };

        let response = self
            .inner
            .client
            .post(format!("{}/rates", self.inner.api_url))
            .bearer_auth(self.inner.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StallionError::Api {
                status,
                body: body.chars().take(500).collect(),
            });
        }

        let parsed: RateResponse = response
            .json()
            .await
            .map_err(|e| StallionError::Response(e.to_string()))?;

        if parsed.rates.is_empty() {
            warn!("carrier returned no rates");
            return Ok(Vec::new());
        }

        let mut rates: Vec<Rate> = parsed.rates.into_iter().map(Rate::from).collect();
        rates.sort_by(|a, b| a.amount.cmp(&b.amount));

        debug!(count = rates.len(), "rates fetched");
        self.inner.cache.insert(cache_key, rates.clone()).await;
        Ok(rates)
    }
}
