//! End-to-end smoke tests against running binaries.
//!
//! These tests require:
//! - The storefront running (cargo run -p kensington-storefront)
//! - The admin running (cargo run -p kensington-admin)
//! - Stallion and backend credentials in environment
//!
//! Run with: cargo test -p kensington-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Base URL for the storefront API (configurable via environment).
fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin API (configurable via environment).
fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Client with a cookie store so the cart session persists across requests.
fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_storefront_health() {
    let resp = session_client()
        .get(format!("{}/health", storefront_base_url()))
        .send()
        .await
        .expect("health request");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_admin_health() {
    let resp = session_client()
        .get(format!("{}/health", admin_base_url()))
        .send()
        .await
        .expect("health request");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_cart_add_then_quote_toronto_flat() {
    let client = session_client();
    let base = storefront_base_url();

    let resp = client
        .post(format!("{base}/cart/lines"))
        .json(&json!({
            "id": "smoke-test-sku",
            "name": "Smoke Test Item",
            "unit_price": "80.00",
            "quantity": 1,
            "image_ref": "products/smoke.jpg"
        }))
        .send()
        .await
        .expect("add line");
    assert!(resp.status().is_success());

    let quote: Value = client
        .post(format!("{base}/checkout/quote"))
        .json(&json!({
            "address": {
                "line1": "1 Main St",
                "city": "Toronto",
                "province": "ON",
                "postal": "M5T 2L9",
                "country_code": "CA"
            }
        }))
        .send()
        .await
        .expect("quote request")
        .json()
        .await
        .expect("quote body");

    assert_eq!(quote["shipping"]["state"], "resolved");
    assert_eq!(quote["shipping"]["amount"], "3.99");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_quote_with_empty_cart_is_rejected() {
    let resp = session_client()
        .post(format!("{}/checkout/quote", storefront_base_url()))
        .json(&json!({
            "address": {
                "line1": "1 Main St",
                "city": "Toronto",
                "province": "ON",
                "postal": "M5T 2L9",
                "country_code": "CA"
            }
        }))
        .send()
        .await
        .expect("quote request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running admin server and backend credentials"]
async fn test_admin_orders_list() {
    let resp = session_client()
        .get(format!("{}/orders", admin_base_url()))
        .send()
        .await
        .expect("orders request");
    assert_eq!(resp.status(), StatusCode::OK);
    let orders: Value = resp.json().await.expect("orders body");
    assert!(orders.is_array());
}

#[tokio::test]
#[ignore = "Requires running admin server and backend credentials"]
async fn test_admin_shipping_loss_report() {
    let resp = session_client()
        .get(format!(
            "{}/reports/shipping-loss?from=2026-01-01&to=2026-12-31",
            admin_base_url()
        ))
        .send()
        .await
        .expect("report request");
    assert_eq!(resp.status(), StatusCode::OK);

    let report: Value = resp.json().await.expect("report body");
    // Aggregates must always be present, even over an empty range.
    assert!(report["total_loss"].is_string() || report["total_loss"].is_number());
    assert!(report["missing_cost_data"].is_number());
}

#[tokio::test]
#[ignore = "Requires running admin server and backend credentials"]
async fn test_admin_rejects_unknown_status_filter() {
    let resp = session_client()
        .get(format!("{}/orders?status=teleported", admin_base_url()))
        .send()
        .await
        .expect("orders request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
