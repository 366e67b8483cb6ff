//! Checkout route handlers.
//!
//! `/checkout/quote` prices the session cart against a shipping address:
//! discount, tax by province, and shipping by zone rule or live carrier
//! rates. Rate-fetch failures degrade to a "calculated at checkout" state in
//! the response body - a broken carrier API must never blank the checkout.
//!
//! `/checkout/session` validates the address, pins the shipping charge, and
//! hands off to the hosted payment session. The cart survives until the
//! payment provider confirms, at which point `/checkout/confirmed` clears it.

use axum::{
    Json,
    extract::{Query, State},
};
use kensington_core::{
    Address, Cart, RawAddress, ShippingMode, ShippingQuote, ShippingRuleReason, free_shipping_gap,
    resolve_shipping, tax_rate,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{instrument, warn};

use crate::error::{AppError, Result};
use crate::rates::QuoteOutcome;
use crate::routes::cart::{CART_KEY, load_cart};
use crate::services::checkout::{CheckoutItem, CheckoutSessionRequest, CheckoutSessionResponse};
use crate::stallion::{Package, Rate, RateSelection, StallionError};
use crate::state::AppState;

fn round(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Body for `POST /checkout/quote` and `POST /checkout/session`.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Address in either upstream dialect; normalized on ingress.
    pub address: RawAddress,
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Carrier service chosen by the customer, when rates were shown.
    #[serde(default)]
    pub selected_service: Option<String>,
}

/// Shipping portion of a quote.
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ShippingView {
    /// A zone rule fixed the charge.
    Resolved {
        mode: ShippingMode,
        amount: Decimal,
        reason: ShippingRuleReason,
        tariff_disclosure: bool,
    },
    /// Carrier rates fetched; cheapest pre-selected.
    Rates {
        selection: RateSelection,
        tariff_disclosure: bool,
    },
    /// Superseded by a newer address edit; the client re-queries.
    Pending { display: &'static str },
    /// Carrier unreachable or offered nothing; retryable, non-fatal.
    Unavailable {
        display: &'static str,
        retryable: bool,
    },
}

/// Full checkout quote for an address + session cart.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub discounted_subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub shipping: ShippingView,
    /// Grand total; absent while shipping is undetermined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    /// Spend remaining before free shipping, for addresses that can qualify.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_shipping_gap: Option<Decimal>,
}

/// `POST /checkout/quote` - price the cart for an address.
#[instrument(skip_all)]
pub async fn quote(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<QuoteResponse>> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("cart is empty".into()));
    }
    let address = body.address.normalize();

    let discount = &state.config().discount;
    let subtotal = cart.subtotal();
    let discounted = discount.apply(subtotal);
    let zone = resolve_shipping(&address, discounted);
    let rate = tax_rate(&address.province);
    let tax = discounted * rate;

    let shipping = match zone.mode {
        ShippingMode::Free | ShippingMode::Flat => ShippingView::Resolved {
            mode: zone.mode,
            amount: zone.amount,
            reason: zone.reason,
            tariff_disclosure: zone.reason.requires_tariff_disclosure(),
        },
        ShippingMode::Variable => {
            variable_shipping(&state, &session, &cart, &address, &zone, discounted).await
        }
    };

    let shipping_amount = match &shipping {
        ShippingView::Resolved { amount, .. } => Some(*amount),
        ShippingView::Rates { selection, .. } => selection.selected_rate().map(|r| r.amount),
        ShippingView::Pending { .. } | ShippingView::Unavailable { .. } => None,
    };

    Ok(Json(QuoteResponse {
        subtotal: round(subtotal),
        discount_amount: round(discount.discount_amount(subtotal)),
        discounted_subtotal: round(discounted),
        tax_rate: rate,
        tax_amount: round(tax),
        shipping,
        total: shipping_amount.map(|s| round(discounted + tax + s)),
        free_shipping_gap: free_shipping_gap(&address, discounted),
    }))
}

/// Fetch carrier rates through the session's debounced quoter.
///
/// Failure here is deliberately absorbed into an `Unavailable` view: the
/// customer keeps their cart and may retry.
async fn variable_shipping(
    state: &AppState,
    session: &Session,
    cart: &Cart,
    address: &Address,
    zone: &ShippingQuote,
    declared_value: Decimal,
) -> ShippingView {
    let session_key = session
        .id()
        .map_or_else(|| address.rate_key(), |id| id.to_string());
    let quoter = state.quoter_for(&session_key).await;

    let key = address.rate_key();
    let stallion = state.stallion().clone();
    let from = state.config().ship_from.clone();
    let to = address.clone();
    let package = Package {
        item_count: cart.item_count(),
        weight_kg: None,
        declared_value,
    };

    let outcome = quoter
        .quote(key, move || async move {
            stallion.get_rates(&from, &to, package).await
        })
        .await;

    match outcome {
        Ok(QuoteOutcome::Fetched(rates) | QuoteOutcome::Deduplicated(rates)) => {
            if rates.is_empty() {
                return ShippingView::Unavailable {
                    display: "calculated_at_checkout",
                    retryable: true,
                };
            }
            ShippingView::Rates {
                selection: RateSelection::from_rates(rates),
                tariff_disclosure: zone.reason.requires_tariff_disclosure(),
            }
        }
        Ok(QuoteOutcome::Superseded) => ShippingView::Pending {
            display: "calculated_at_checkout",
        },
        Err(err) => {
            warn!(error = %err, "rate fetch failed; degrading to calculated-at-checkout");
            ShippingView::Unavailable {
                display: "calculated_at_checkout",
                retryable: true,
            }
        }
    }
}

/// `POST /checkout/session` - create the hosted payment session.
#[instrument(skip_all)]
pub async fn create_session(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<CheckoutSessionResponse>> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("cart is empty".into()));
    }
    let customer_email = body
        .customer_email
        .as_deref()
        .map(str::trim)
        .filter(|e| e.contains('@'))
        .ok_or_else(|| AppError::BadRequest("a valid email is required".into()))?
        .to_string();

    let address = body.address.normalize();
    address.validate().map_err(AppError::AddressValidation)?;

    let discount = &state.config().discount;
    let subtotal = cart.subtotal();
    let discounted = discount.apply(subtotal);
    let zone = resolve_shipping(&address, discounted);
    let rate = tax_rate(&address.province);

    // Pin the shipping charge. Variable zones need a live rate at submission
    // time; here a carrier failure does block this step (and only this step),
    // surfacing as a retryable error while the cart stays intact.
    let (shipping_cost, shipping_method) = match zone.mode {
        ShippingMode::Free => (Decimal::ZERO, "Free Shipping (GTA)".to_string()),
        ShippingMode::Flat => (zone.amount, "Toronto Local Delivery".to_string()),
        ShippingMode::Variable => {
            let package = Package {
                item_count: cart.item_count(),
                weight_kg: None,
                declared_value: discounted,
            };
            let rates = state
                .stallion()
                .get_rates(&state.config().ship_from, &address, package)
                .await?;
            let mut selection = RateSelection::from_rates(rates);
            if let Some(service) = &body.selected_service {
                selection.select(service);
            }
            let chosen: &Rate = selection.selected_rate().ok_or(StallionError::NoRates)?;
            (chosen.amount, chosen.display_name.clone())
        }
    };

    let request = CheckoutSessionRequest {
        items: cart
            .lines()
            .iter()
            .map(|l| CheckoutItem {
                name: l.name.clone(),
                price: round(discount.apply(l.unit_price)),
                quantity: l.quantity,
                image_ref: l.image_ref.clone(),
            })
            .collect(),
        customer_email,
        shipping_address: address.clone(),
        shipping_cost: round(shipping_cost),
        shipping_method,
        tax_amount: round(discounted * rate),
        tax_rate: rate,
        province: address.province.clone(),
    };

    let response = state.checkout().create_session(&request).await?;
    Ok(Json(response))
}

/// Query for `GET /checkout/confirmed`.
#[derive(Debug, Deserialize)]
pub struct ConfirmedQuery {
    pub session_id: String,
}

/// Confirmation body after payment completes.
#[derive(Debug, Serialize)]
pub struct ConfirmedResponse {
    pub session_id: String,
    pub cart_cleared: bool,
}

/// `GET /checkout/confirmed` - payment-complete redirect target.
///
/// The cart is cleared here, on confirmation, not at session creation: an
/// abandoned payment keeps the customer's cart intact.
#[instrument(skip_all, fields(session_id = %query.session_id))]
pub async fn payment_confirmed(
    session: Session,
    Query(query): Query<ConfirmedQuery>,
) -> Result<Json<ConfirmedResponse>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    session.insert(CART_KEY, &cart).await?;
    Ok(Json(ConfirmedResponse {
        session_id: query.session_id,
        cart_cleared: true,
    }))
}
