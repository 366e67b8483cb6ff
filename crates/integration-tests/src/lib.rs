//! Integration tests for Kensington.
//!
//! # Test Categories
//!
//! - `order_economics` - Full pricing scenarios across the core rules:
//!   tax, discount, shipping zones, rate selection, refunds, and the
//!   shipping-loss report. These run in-process with no server.
//! - `live_smoke` - End-to-end smoke tests against running binaries,
//!   marked `#[ignore]`; run them with both servers up:
//!
//! ```bash
//! cargo run -p kensington-storefront &
//! cargo run -p kensington-admin &
//! cargo test -p kensington-integration-tests -- --ignored
//! ```
