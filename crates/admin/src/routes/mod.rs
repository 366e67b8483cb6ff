//! Admin route handlers.

pub mod fulfillment;
pub mod orders;
pub mod reconciliation;
pub mod refunds;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(orders::list))
        .route("/orders/{id}", get(orders::detail))
        .route("/orders/{id}/status", post(orders::set_status))
        .route("/orders/{id}/refunds", post(refunds::create))
        .route("/orders/{id}/shipment", post(fulfillment::create_shipment))
        .route(
            "/orders/{id}/tracking/sync",
            post(fulfillment::sync_tracking),
        )
        .route("/reports/shipping-loss", get(reconciliation::shipping_loss))
}
