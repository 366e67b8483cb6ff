//! Managed-backend order store client.
//!
//! Orders are persisted by an external managed backend; this module is the
//! only place its REST dialect is spoken. Raw rows arrive with the store's
//! own field names (`stallion_shipment_id`, `address_1`, ...) and are
//! normalized into [`kensington_core::Order`] before anything else sees them.

mod client;
pub mod types;

pub use client::BackendClient;
pub use types::{FulfillmentUpdate, OrderRow, RefundCall, RefundOutcome};

use thiserror::Error;

/// Errors talking to the managed backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the API.
    #[error("backend returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response body did not match the expected shape.
    #[error("backend response error: {0}")]
    Response(String),

    /// A stored row could not be normalized into a domain order.
    #[error("malformed order {id}: {reason}")]
    MalformedOrder { id: String, reason: String },

    /// Order does not exist.
    #[error("order not found: {0}")]
    NotFound(String),
}
