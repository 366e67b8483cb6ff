//! Storefront route handlers.

pub mod cart;
pub mod checkout;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the storefront router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::get_cart))
        .route("/cart/lines", post(cart::add_line))
        .route(
            "/cart/lines/{id}",
            axum::routing::patch(cart::update_line).delete(cart::remove_line),
        )
        .route("/checkout/quote", post(checkout::quote))
        .route("/checkout/session", post(checkout::create_session))
        .route("/checkout/confirmed", get(checkout::payment_confirmed))
}
