//! Cart route handlers.
//!
//! The cart lives in the customer's session and is returned in full after
//! every mutation so the drawer can re-render without a second round trip.
//! Totals here use the same pricing functions as checkout, which is what
//! keeps the drawer and the checkout page consistent.

use axum::{
    Json,
    extract::{Path, State},
};
use kensington_core::{Cart, CartLine, DiscountPolicy, FREE_SHIPPING_THRESHOLD};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Session key for the cart.
pub const CART_KEY: &str = "cart";

/// Cart totals for the drawer and mini-cart.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub subtotal: Decimal,
    /// Present only when a store-wide discount is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountView>,
    pub discounted_subtotal: Decimal,
    /// Spend remaining before the GTA free-shipping threshold; the drawer
    /// shows this as a progress bar for prospective GTA customers.
    pub gta_free_shipping_gap: Decimal,
    /// Shipping is unknown until an address exists; the drawer renders this
    /// fixed state instead of a number.
    pub shipping_display: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
    pub image_ref: String,
}

#[derive(Debug, Serialize)]
pub struct DiscountView {
    pub name: String,
    pub amount: Decimal,
}

impl CartView {
    fn build(cart: &Cart, discount: &DiscountPolicy) -> Self {
        let round =
            |d: Decimal| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let subtotal = cart.subtotal();
        let discounted = discount.apply(subtotal);
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|l| CartLineView {
                    id: l.id.clone(),
                    name: l.name.clone(),
                    unit_price: l.unit_price,
                    quantity: l.quantity,
                    line_total: round(l.line_total()),
                    image_ref: l.image_ref.clone(),
                })
                .collect(),
            item_count: cart.item_count(),
            subtotal: round(subtotal),
            discount: discount.enabled.then(|| DiscountView {
                name: discount.name.clone(),
                amount: round(discount.discount_amount(subtotal)),
            }),
            discounted_subtotal: round(discounted),
            gta_free_shipping_gap: round((FREE_SHIPPING_THRESHOLD - discounted).max(Decimal::ZERO)),
            shipping_display: "calculated_at_checkout",
        }
    }
}

/// Load the session cart, defaulting to empty.
pub async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session.get::<Cart>(CART_KEY).await?.unwrap_or_default())
}

async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(CART_KEY, cart).await?;
    Ok(())
}

/// `GET /cart` - current cart with totals.
#[instrument(skip_all)]
pub async fn get_cart(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::build(&cart, &state.config().discount)))
}

/// Body for `POST /cart/lines`.
#[derive(Debug, Deserialize)]
pub struct AddLineRequest {
    pub id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub image_ref: String,
}

/// `POST /cart/lines` - add a product, merging quantity on repeat adds.
#[instrument(skip_all, fields(line_id = %body.id, quantity = body.quantity))]
pub async fn add_line(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddLineRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.add_line(CartLine {
        id: body.id,
        name: body.name,
        unit_price: body.unit_price,
        quantity: body.quantity,
        image_ref: body.image_ref,
    })?;
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::build(&cart, &state.config().discount)))
}

/// Body for `PATCH /cart/lines/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateLineRequest {
    pub quantity: u32,
}

/// `PATCH /cart/lines/{id}` - set quantity; 0 removes the line.
#[instrument(skip_all, fields(line_id = %id, quantity = body.quantity))]
pub async fn update_line(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(body): Json<UpdateLineRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.set_quantity(&id, body.quantity)?;
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::build(&cart, &state.config().discount)))
}

/// `DELETE /cart/lines/{id}` - remove a line.
#[instrument(skip_all, fields(line_id = %id))]
pub async fn remove_line(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.remove_line(&id)?;
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::build(&cart, &state.config().discount)))
}
