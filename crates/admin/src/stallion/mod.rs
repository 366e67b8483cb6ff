//! Stallion Express shipment client (admin side).
//!
//! The storefront rate-shops; the admin creates shipments, buys labels, and
//! syncs tracking. Each binary carries its own client for the surface it
//! needs.

mod client;
pub mod types;

pub use client::StallionClient;
pub use types::{Shipment, ShipmentRequest};

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
}
