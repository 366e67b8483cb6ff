//! Kensington Admin library.
//!
//! Back-office surface: orders, fulfillment, refunds, and shipping-loss
//! reporting. Exposed as a library so route logic is testable.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod routes;
pub mod stallion;
pub mod state;
