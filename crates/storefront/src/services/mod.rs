//! External service clients consumed by the storefront.

pub mod checkout;
