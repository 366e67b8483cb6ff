//! Stallion Express carrier rate client.
//!
//! Thin typed adapter over the Stallion REST API. The storefront only
//! rate-shops here; shipment creation lives in the admin binary, which holds
//! its own client.

mod client;
pub mod types;

pub use client::StallionClient;
pub use types::{Package, Rate, RateSelection};

use thiserror::Error;

/// Errors that can occur when talking to Stallion Express.
#[derive(Debug, Error)]
pub enum StallionError {
    /// HTTP request failed.
    #[error("Stallion request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the API.
    #[error("Stallion API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response body did not match the expected shape.
    #[error("Stallion response error: {0}")]
    Response(String),

    /// The API answered but offered no rates for the shipment.
    ///
    /// Non-fatal: the checkout surfaces a "try again" state.
    #[error("no rates available for this shipment")]
    NoRates,
}
