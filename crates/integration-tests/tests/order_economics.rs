//! End-to-end order-economics scenarios.
//!
//! Each test walks a realistic order through the full pricing pipeline -
//! cart subtotal, store discount, tax, shipping zone, rate selection - and
//! checks the money at every seam. These run in-process; no servers or
//! carrier credentials required.

use kensington_core::{
    Address, Cart, CartLine, CurrencyCode, DiscountPolicy, FulfillmentStatus, Money, Order,
    OrderStatus, RefundError, RefundRequest, RefundType, ShippingMode, ShippingRuleReason,
    TORONTO_FLAT_RATE, free_shipping_gap, reconcile, resolve_shipping, tax_amount, tax_rate,
};
use kensington_storefront::stallion::{Rate, RateSelection};
use rust_decimal::Decimal;

fn address(city: &str, province: &str, postal: &str, country: &str) -> Address {
    Address {
        name: Some("Test Customer".into()),
        line1: "1 Main St".into(),
        line2: None,
        city: city.into(),
        province: province.into(),
        country: country.into(),
        postal_code: postal.into(),
        phone: None,
    }
}

fn cart_with(lines: &[(&str, i64, u32)]) -> Cart {
    let mut cart = Cart::new();
    for (id, price_cents, qty) in lines {
        cart.add_line(CartLine {
            id: (*id).to_string(),
            name: format!("Product {id}"),
            unit_price: Decimal::new(*price_cents, 2),
            quantity: *qty,
            image_ref: format!("products/{id}.jpg"),
        })
        .expect("positive quantity");
    }
    cart
}

fn dollars(d: i64) -> Decimal {
    Decimal::from(d)
}

fn cents(c: i64) -> Decimal {
    Decimal::new(c, 2)
}

/// $80 subtotal, no discount, Toronto address: flat $3.99 shipping and 13%
/// Ontario tax on the subtotal.
#[test]
fn test_toronto_order_totals() {
    let cart = cart_with(&[("tea-towel", 2_000, 2), ("basket", 4_000, 1)]);
    assert_eq!(cart.subtotal(), dollars(80));

    let discount = DiscountPolicy::disabled();
    let taxable = discount.apply(cart.subtotal());
    assert_eq!(taxable, dollars(80));

    let to = address("Toronto", "ON", "M5T2L9", "CA");
    let quote = resolve_shipping(&to, taxable);
    assert_eq!(quote.mode, ShippingMode::Flat);
    assert_eq!(quote.amount, TORONTO_FLAT_RATE);

    let tax = tax_amount(taxable, &to.province);
    assert_eq!(tax, cents(1_040)); // 80 * 0.13

    let total = taxable + tax + quote.amount;
    assert_eq!(total, cents(9_439)); // 80 + 10.40 + 3.99
}

/// The same cart shipped within the GTA (outside Toronto proper) crosses the
/// free-shipping threshold; under it, rates come from the carrier.
#[test]
fn test_gta_threshold_controls_shipping_mode() {
    let oshawa = address("Oshawa", "ON", "L1H1A1", "CA");

    let small = cart_with(&[("coasters", 2_000, 2)]); // $40
    let quote = resolve_shipping(&oshawa, small.subtotal());
    assert_eq!(quote.mode, ShippingMode::Variable);
    assert_eq!(quote.reason, ShippingRuleReason::CarrierRates);
    // The cart drawer can tell the customer how much more to add.
    assert_eq!(
        free_shipping_gap(&oshawa, small.subtotal()),
        Some(dollars(10))
    );

    let large = cart_with(&[("coasters", 2_000, 2), ("trivet", 1_500, 1)]); // $55
    let quote = resolve_shipping(&oshawa, large.subtotal());
    assert_eq!(quote.mode, ShippingMode::Free);
    assert_eq!(quote.amount, Decimal::ZERO);
}

/// A store-wide discount changes the taxable base and can push an order over
/// the free-shipping threshold or back under it.
#[test]
fn test_discount_feeds_tax_and_shipping_threshold() {
    let policy = DiscountPolicy::new(true, "Grand Opening", dollars(20)).expect("valid policy");
    let cart = cart_with(&[("lantern", 10_000, 1)]); // $100

    let discounted = policy.apply(cart.subtotal());
    assert_eq!(discounted, dollars(80));
    assert_eq!(policy.discount_amount(cart.subtotal()), dollars(20));
    // The split is exact, not a rounded approximation.
    assert_eq!(
        discounted + policy.discount_amount(cart.subtotal()),
        cart.subtotal()
    );

    // Tax applies to the discounted amount.
    assert_eq!(tax_amount(discounted, "ON"), cents(1_040));

    // $60 cart discounted 20% lands at $48: under the threshold, so a GTA
    // order that shipped free at full price now needs carrier rates.
    let borderline = cart_with(&[("lantern", 6_000, 1)]);
    let oshawa = address("Whitby", "ON", "L1N5R5", "CA");
    assert_eq!(
        resolve_shipping(&oshawa, borderline.subtotal()).mode,
        ShippingMode::Free
    );
    assert_eq!(
        resolve_shipping(&oshawa, policy.apply(borderline.subtotal())).mode,
        ShippingMode::Variable
    );
}

/// Provincial rates fall back to the Ontario default for unknown codes.
#[test]
fn test_tax_rates_by_province() {
    assert_eq!(tax_rate("ON"), cents(13));
    assert_eq!(tax_rate("ns"), cents(15));
    assert_eq!(tax_rate("QC"), Decimal::new(14_975, 5));
    assert_eq!(tax_rate("AB"), cents(5));
    assert_eq!(tax_rate("ZZ"), cents(13));
    assert_eq!(tax_rate(""), cents(13));
}

/// US destinations get carrier rates plus the tariff disclosure.
#[test]
fn test_us_order_requires_tariff_disclosure() {
    let buffalo = address("Buffalo", "NY", "14201", "US");
    let quote = resolve_shipping(&buffalo, dollars(200));
    assert_eq!(quote.mode, ShippingMode::Variable);
    assert!(quote.reason.requires_tariff_disclosure());
}

/// Carrier rates come back sorted ascending with the cheapest pre-selected;
/// a customer's explicit choice sticks.
#[test]
fn test_rate_shopping_selection() {
    let rates = vec![
        Rate {
            carrier_service_id: "canada_post_priority".into(),
            display_name: "Canada Post Priority".into(),
            amount: cents(2_450),
            currency: CurrencyCode::CAD,
            eta_days: Some(1),
        },
        Rate {
            carrier_service_id: "canada_post_regular".into(),
            display_name: "Canada Post Regular".into(),
            amount: cents(1_099),
            currency: CurrencyCode::CAD,
            eta_days: Some(5),
        },
        Rate {
            carrier_service_id: "canada_post_expedited".into(),
            display_name: "Canada Post Expedited".into(),
            amount: cents(1_450),
            currency: CurrencyCode::CAD,
            eta_days: Some(3),
        },
    ];

    let mut selection = RateSelection::from_rates(rates);
    let amounts: Vec<_> = selection.rates.iter().map(|r| r.amount).collect();
    assert!(amounts.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(selection.selected.as_deref(), Some("canada_post_regular"));

    assert!(selection.select("canada_post_expedited"));
    assert_eq!(
        selection.selected_rate().map(|r| r.amount),
        Some(cents(1_450))
    );
}

fn shipped_order(
    id: &str,
    charged_cents: i64,
    actual_cents: Option<i64>,
    mode: Option<ShippingMode>,
) -> Order {
    Order {
        id: id.to_string(),
        created_at: chrono::Utc::now(),
        status: OrderStatus::Completed,
        fulfillment_status: FulfillmentStatus::Shipped,
        line_items: Vec::new(),
        customer_email: "c@example.com".into(),
        shipping_address: address("Oshawa", "ON", "L1H1A1", "CA"),
        charged_shipping: Money::cad(cents(charged_cents)),
        actual_shipping_cost: actual_cents.map(|c| Money::cad(cents(c))),
        shipping_mode: mode,
        tax_amount: Money::zero(),
        tax_rate: Decimal::ZERO,
        total: Money::cad(dollars(100)),
        currency: CurrencyCode::CAD,
        tracking_number: None,
        carrier_shipment_id: None,
        shipping_label_url: None,
        refund_amount: Decimal::ZERO,
    }
}

/// The loss report over a month of mixed orders: losses and gains partition
/// by sign, missing cost data is surfaced rather than zeroed, and the
/// free-shipping zone gets its own subtotals.
#[test]
fn test_shipping_loss_report() {
    let orders = vec![
        shipped_order("a", 399, Some(1_250), Some(ShippingMode::Flat)), // -8.51
        shipped_order("b", 0, Some(925), Some(ShippingMode::Free)),     // -9.25
        shipped_order("c", 1_500, Some(1_100), Some(ShippingMode::Variable)), // +4.00
        shipped_order("d", 399, None, Some(ShippingMode::Flat)),        // no data
    ];

    let report = reconcile(&orders);
    assert_eq!(report.orders_with_cost_data, 3);
    assert_eq!(report.missing_cost_data, 1);
    assert_eq!(report.missing_cost_order_ids, vec!["d".to_string()]);

    assert_eq!(report.total_loss, cents(1_776));
    assert_eq!(report.total_gain, cents(400));
    assert_eq!(report.biggest_loss, cents(925));
    assert_eq!(report.average_loss, cents(888));

    // Losses minus gains equals the signed sum of differences.
    let signed: Decimal = report.rows.iter().filter_map(|r| r.difference).sum();
    assert_eq!(signed, report.total_loss - report.total_gain);

    // The free zone and subsidy track only free-shipped orders.
    assert_eq!(report.free_shipping_zone.order_count, 1);
    assert_eq!(report.total_discounts_given, cents(925));

    // The excluded order appears as a row without fabricated numbers.
    let row = report.rows.iter().find(|r| r.order_id == "d").expect("row");
    assert_eq!(row.actual, None);
    assert_eq!(row.difference, None);
}

/// Refunds are validated against the live remainder before anything leaves
/// the process; the lifecycle gates which orders can be refunded at all.
#[test]
fn test_refund_bounds_and_lifecycle() {
    let mut order = shipped_order("ord_9", 399, Some(1_250), Some(ShippingMode::Flat));
    order.refund_amount = dollars(60);

    let over = RefundRequest {
        amount: Money::cad(dollars(50)),
        reason: "damaged".into(),
        refund_type: RefundType::Stripe,
        notes: None,
    };
    assert_eq!(
        over.validate(&order),
        Err(RefundError::ExceedsRemainder {
            requested: dollars(50),
            remaining: dollars(40),
        })
    );

    let exact = RefundRequest {
        amount: Money::cad(dollars(40)),
        ..over
    };
    assert!(exact.validate(&order).is_ok());

    // A completed order can move to refunded and nowhere else.
    assert!(order.status.transition_to(OrderStatus::Refunded).is_ok());
    assert!(order.status.transition_to(OrderStatus::Pending).is_err());
    assert!(order.status.transition_to(OrderStatus::Processing).is_err());

    // Terminal states admit nothing.
    for next in [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Refunded,
    ] {
        assert!(OrderStatus::Cancelled.transition_to(next).is_err());
    }
}

/// The operator's happy path through the lifecycle.
#[test]
fn test_order_lifecycle_happy_path() {
    let status = OrderStatus::Pending;
    let status = status.transition_to(OrderStatus::Processing).expect("pending -> processing");
    let status = status.transition_to(OrderStatus::Completed).expect("processing -> completed");
    assert_eq!(status, OrderStatus::Completed);
    // Completion cannot be skipped from pending.
    assert!(OrderStatus::Pending.transition_to(OrderStatus::Completed).is_err());
}
