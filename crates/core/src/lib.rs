//! Kensington Core - shared domain types and order-economics rules.
//!
//! This crate provides the types and pure business rules used by both
//! Kensington binaries:
//! - `storefront` - Public-facing e-commerce site
//! - `admin` - Internal back-office (orders, fulfillment, refunds, reports)
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no database access. Every pricing decision (tax, discounts,
//! shipping zones, shipping-loss reconciliation) takes its inputs as explicit
//! arguments so it can be tested in isolation and reused from any surface.
//!
//! # Modules
//!
//! - [`types`] - Canonical domain types: money, addresses, carts, orders, refunds
//! - [`pricing`] - Tax, discount, shipping-zone, and reconciliation rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pricing;
pub mod types;

pub use pricing::*;
pub use types::*;
