//! Checkout-session edge function client.
//!
//! Payment collection is handled by a managed serverless function that
//! creates a hosted payment session and returns a redirect URL. This client
//! only builds the request contract and relays the response; it never sees
//! card data.

use kensington_core::Address;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

/// Errors creating a checkout session.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// HTTP request failed.
    #[error("checkout request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the function.
    #[error("checkout function returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response body did not match the expected shape.
    #[error("checkout response error: {0}")]
    Response(String),
}

/// A purchasable line sent to the payment session.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutItem {
    pub name: String,
    /// Unit price after any store-wide discount, rounded to cents.
    pub price: Decimal,
    pub quantity: u32,
    pub image_ref: String,
}

/// Request contract for the checkout-session function.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionRequest {
    pub items: Vec<CheckoutItem>,
    pub customer_email: String,
    pub shipping_address: Address,
    /// Resolved shipping charge, rounded to cents.
    pub shipping_cost: Decimal,
    /// Customer-facing shipping method name.
    pub shipping_method: String,
    /// Tax on the discounted subtotal, rounded to cents.
    pub tax_amount: Decimal,
    pub tax_rate: Decimal,
    pub province: String,
}

/// Response from the checkout-session function.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResponse {
    pub session_id: String,
    /// Redirect target for payment completion.
    pub url: String,
}

/// Client for the checkout-session edge function.
#[derive(Clone)]
pub struct CheckoutClient {
    client: reqwest::Client,
    function_url: String,
    service_key: SecretString,
}

impl std::fmt::Debug for CheckoutClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutClient")
            .field("function_url", &self.function_url)
            .field("service_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl CheckoutClient {
    /// Create a new checkout client.
    #[must_use]
    pub fn new(function_url: String, service_key: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            function_url,
            service_key,
        }
    }

    /// Create a hosted payment session.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] when the request fails or the function
    /// answers with a non-success status. The caller keeps the cart and form
    /// state either way.
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn create_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSessionResponse, CheckoutError> {
        let response = self
            .client
            .post(&self.function_url)
            .bearer_auth(self.service_key.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckoutError::Api {
                status,
                body: body.chars().take(500).collect(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| CheckoutError::Response(e.to_string()))
    }
}
