//! Canonical domain types for Kensington.
//!
//! Upstream services speak several naming dialects for the same concepts;
//! everything is normalized into these types at the boundary so business
//! logic never branches on wire-shape differences.

pub mod address;
pub mod cart;
pub mod money;
pub mod order;
pub mod package;
pub mod refund;

pub use address::{Address, AddressFieldError, RawAddress};
pub use cart::{Cart, CartError, CartLine};
pub use money::{CurrencyCode, Money};
pub use order::*;
pub use package::{ESTIMATED_ITEM_WEIGHT_KG, MIN_PACKAGE_WEIGHT_KG, Package};
pub use refund::{Refund, RefundError, RefundRequest, RefundType};
