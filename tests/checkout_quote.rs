//! End-to-end quotation tests over YAML fixture data.
//!
//! The catalog carries one product per discount situation:
//!
//! - `fc-1001` Jamdani Kameez (dresses): 20% standing discount, also
//!   targeted by the gated "Big Basket Bonus" offer;
//! - `fc-2001` Silk Saree (sarees): no standing discount, targeted by the
//!   capped "Eid Splash" offer;
//! - `fc-3001` Embroidered Panjabi (menswear): flat standing discount, also
//!   targeted by "Big Basket Bonus";
//! - `fc-4001` Muslin Scarf (accessories): only targeted by an inactive
//!   offer, so it always prices from its own data.

use chrono::{DateTime, FixedOffset};
use rusty_money::{Money, iso::BDT};
use testresult::TestResult;

use jamdani::{
    calendar::parse_order_timestamp,
    cart::{Cart, CartLine},
    fixtures::Fixture,
    products::ProductId,
    quote::{CheckoutQuote, CheckoutRequest},
    shipping::DeliveryMethod,
};

const CATALOG_YAML: &str = r#"
currency: BDT
products:
  kameez:
    id: fc-1001
    name: Jamdani Kameez
    category: dresses
    price: "2400 BDT"
    discount: { kind: percentage, value: "20%" }
  saree:
    id: fc-2001
    name: Silk Saree
    category: sarees
    price: "5000 BDT"
  panjabi:
    id: fc-3001
    name: Embroidered Panjabi
    category: menswear
    price: "1800 BDT"
    discount: { kind: flat, value: "150 BDT" }
  scarf:
    id: fc-4001
    name: Muslin Scarf
    category: accessories
    price: "650 BDT"
"#;

const OFFERS_YAML: &str = r#"
offers:
  - name: Eid Splash
    active: true
    expires_on: "2026-09-30"
    categories: [sarees]
    discount: { kind: percentage, value: "10%" }
    max_amount: "400 BDT"
  - name: Big Basket Bonus
    active: true
    expires_on: "2026-12-31"
    categories: [dresses, menswear]
    discount: { kind: amount, value: "250 BDT" }
    min_subtotal: "5000 BDT"
  - name: Last Winter
    active: false
    expires_on: "2026-02-28"
    categories: [accessories]
    discount: { kind: percentage, value: "50%" }
"#;

const PROMOS_YAML: &str = r#"
promos:
  - code: SUMMER10
    active: true
    expires_on: "2026-09-30"
    min_subtotal: "1000 BDT"
    discount: { kind: percentage, value: "10%" }
    max_amount: "300 BDT"
  - code: FLAT200
    active: true
    expires_on: "2026-12-31"
    min_subtotal: "2000 BDT"
    discount: { kind: amount, value: "200 BDT" }
"#;

const ZONES_YAML: &str = r#"
zones:
  - name: Dhaka Metro
    cities: [Dhaka]
    charges: { STANDARD: "60 BDT", EXPRESS: "150 BDT" }
    durations: { STANDARD: "1-2", EXPRESS: "5" }
  - name: Divisional Cities
    cities: [Chattogram, Sylhet]
    charges: { STANDARD: "120 BDT" }
    durations: { STANDARD: "2-3" }
"#;

fn fixture() -> Result<Fixture, jamdani::fixtures::FixtureError> {
    Fixture::from_strs(
        CATALOG_YAML,
        Some(OFFERS_YAML),
        Some(PROMOS_YAML),
        Some(ZONES_YAML),
    )
}

fn afternoon() -> Result<DateTime<FixedOffset>, jamdani::calendar::CalendarError> {
    parse_order_timestamp("06-08-26 | 14:30")
}

#[test]
fn full_checkout_combines_every_component() -> TestResult {
    let fixture = fixture()?;

    let cart = Cart::with_lines(vec![
        CartLine::new(ProductId::from("fc-1001"), 2)?,
        CartLine::new(ProductId::from("fc-2001"), 1)?,
        CartLine::new(ProductId::from("fc-3001"), 1)?,
    ]);

    let quote = CheckoutQuote::assemble(&CheckoutRequest {
        cart: &cart,
        catalog: &fixture.catalog,
        offers: &fixture.offers,
        promo: fixture.promo("SUMMER10"),
        zones: &fixture.zones,
        city: Some("Sylhet"),
        delivery: None,
        placed_at: afternoon()?,
    })?;

    // Every product in the cart is targeted by a live offer, so all three
    // lines price at their regular price and standing discounts never fire:
    // 2 × 2400 + 5000 + 1800 = 11600.
    assert_eq!(quote.subtotal(), Money::from_minor(1_160_000, BDT));

    // Offer pass (subtotal passes the 5000 gate):
    //   kameez line — Big Basket Bonus, flat 250;
    //   saree line  — Eid Splash, 10% of 5000 = 500, capped at 400;
    //   panjabi line — Big Basket Bonus, flat 250.
    assert_eq!(quote.offer_discount(), Money::from_minor(90_000, BDT));

    // SUMMER10: 10% of 11600 = 1160, capped at 300.
    assert_eq!(quote.promo_discount(), Money::from_minor(30_000, BDT));

    // Sylhet defaults to standard delivery.
    assert_eq!(quote.shipping_charge(), Money::from_minor(12_000, BDT));
    assert_eq!(quote.delivery_duration(), Some("2-3"));
    assert_eq!(quote.expected_delivery(), Some("August 09, 2026"));

    // 11600 − 300 − 900 + 120 = 10520
    assert_eq!(quote.total(), Money::from_minor(1_052_000, BDT));
    assert_eq!(quote.item_count(), 4);

    Ok(())
}

#[test]
fn standing_discounts_apply_when_no_offer_targets_the_line() -> TestResult {
    let fixture = fixture()?;

    // The scarf's only offer is switched off, so it prices from its own
    // data; it has no standing discount either.
    let cart = Cart::with_lines(vec![CartLine::new(ProductId::from("fc-4001"), 2)?]);

    let quote = CheckoutQuote::assemble(&CheckoutRequest {
        cart: &cart,
        catalog: &fixture.catalog,
        offers: &fixture.offers,
        promo: None,
        zones: &fixture.zones,
        city: None,
        delivery: None,
        placed_at: afternoon()?,
    })?;

    assert_eq!(quote.subtotal(), Money::from_minor(130_000, BDT));
    assert_eq!(quote.offer_discount(), Money::from_minor(0, BDT));
    assert_eq!(quote.total(), Money::from_minor(130_000, BDT));

    Ok(())
}

#[test]
fn gated_offer_suppresses_standing_discount_but_pays_nothing_below_gate() -> TestResult {
    let fixture = fixture()?;

    // One kameez: the Big Basket Bonus is live and targets it, so the unit
    // price is the regular 2400 (not the 20%-discounted 1920) — but the
    // subtotal stays below the 5000 gate, so the offer pays no line
    // discount either.
    let cart = Cart::with_lines(vec![CartLine::new(ProductId::from("fc-1001"), 1)?]);

    let quote = CheckoutQuote::assemble(&CheckoutRequest {
        cart: &cart,
        catalog: &fixture.catalog,
        offers: &fixture.offers,
        promo: fixture.promo("FLAT200"),
        zones: &fixture.zones,
        city: None,
        delivery: None,
        placed_at: afternoon()?,
    })?;

    assert_eq!(quote.subtotal(), Money::from_minor(240_000, BDT));
    assert_eq!(quote.offer_discount(), Money::from_minor(0, BDT));

    // FLAT200 still applies: 2400 ≥ its 2000 minimum.
    assert_eq!(quote.promo_discount(), Money::from_minor(20_000, BDT));
    assert_eq!(quote.total(), Money::from_minor(220_000, BDT));

    Ok(())
}

#[test]
fn dhaka_requires_an_explicit_delivery_method() -> TestResult {
    let fixture = fixture()?;
    let cart = Cart::with_lines(vec![CartLine::new(ProductId::from("fc-2001"), 1)?]);

    let unrouted = CheckoutQuote::assemble(&CheckoutRequest {
        cart: &cart,
        catalog: &fixture.catalog,
        offers: &[],
        promo: None,
        zones: &fixture.zones,
        city: Some("Dhaka"),
        delivery: None,
        placed_at: afternoon()?,
    })?;

    assert_eq!(unrouted.shipping_charge(), Money::from_minor(0, BDT));
    assert_eq!(unrouted.expected_delivery(), None);

    let express = CheckoutQuote::assemble(&CheckoutRequest {
        cart: &cart,
        catalog: &fixture.catalog,
        offers: &[],
        promo: None,
        zones: &fixture.zones,
        city: Some("Dhaka"),
        delivery: Some(DeliveryMethod::Express),
        placed_at: afternoon()?,
    })?;

    assert_eq!(express.shipping_charge(), Money::from_minor(15_000, BDT));

    // Express counts the 5-hour duration from 14:30, still the same day.
    assert_eq!(express.expected_delivery(), Some("August 06, 2026"));

    Ok(())
}

#[test]
fn promo_is_honoured_through_the_last_minute_of_its_expiry_day() -> TestResult {
    let fixture = fixture()?;
    let cart = Cart::with_lines(vec![CartLine::new(ProductId::from("fc-2001"), 1)?]);

    let last_minute = CheckoutQuote::assemble(&CheckoutRequest {
        cart: &cart,
        catalog: &fixture.catalog,
        offers: &[],
        promo: fixture.promo("SUMMER10"),
        zones: &[],
        city: None,
        delivery: None,
        placed_at: parse_order_timestamp("30-09-26 | 23:59")?,
    })?;

    // 10% of 5000 = 500, capped at 300.
    assert_eq!(last_minute.promo_discount(), Money::from_minor(30_000, BDT));

    let next_morning = CheckoutQuote::assemble(&CheckoutRequest {
        cart: &cart,
        catalog: &fixture.catalog,
        offers: &[],
        promo: fixture.promo("SUMMER10"),
        zones: &[],
        city: None,
        delivery: None,
        placed_at: parse_order_timestamp("01-10-26 | 08:00")?,
    })?;

    assert_eq!(next_morning.promo_discount(), Money::from_minor(0, BDT));

    Ok(())
}

#[test]
fn first_listed_offer_wins_when_two_target_the_same_product() -> TestResult {
    let rival_offers = r#"
offers:
  - name: First Dibs
    active: true
    expires_on: "2026-12-31"
    categories: [sarees]
    discount: { kind: percentage, value: "10%" }
  - name: Bigger But Later
    active: true
    expires_on: "2026-12-31"
    categories: [sarees]
    discount: { kind: percentage, value: "50%" }
"#;

    let fixture = Fixture::from_strs(CATALOG_YAML, Some(rival_offers), None, None)?;
    let cart = Cart::with_lines(vec![CartLine::new(ProductId::from("fc-2001"), 1)?]);

    let quote = CheckoutQuote::assemble(&CheckoutRequest {
        cart: &cart,
        catalog: &fixture.catalog,
        offers: &fixture.offers,
        promo: None,
        zones: &[],
        city: None,
        delivery: None,
        placed_at: afternoon()?,
    })?;

    // 10% from "First Dibs", not 50% from the later offer.
    assert_eq!(quote.offer_discount(), Money::from_minor(50_000, BDT));

    Ok(())
}

#[test]
fn amount_offers_are_flat_per_line_regardless_of_quantity() -> TestResult {
    let fixture = fixture()?;

    // Five panjabis clear the 5000 gate on their own: 5 × 1800 = 9000.
    let cart = Cart::with_lines(vec![CartLine::new(ProductId::from("fc-3001"), 5)?]);

    let quote = CheckoutQuote::assemble(&CheckoutRequest {
        cart: &cart,
        catalog: &fixture.catalog,
        offers: &fixture.offers,
        promo: None,
        zones: &[],
        city: None,
        delivery: None,
        placed_at: afternoon()?,
    })?;

    assert_eq!(quote.subtotal(), Money::from_minor(900_000, BDT));

    // One flat 250 for the whole line, not 5 × 250.
    assert_eq!(quote.offer_discount(), Money::from_minor(25_000, BDT));

    Ok(())
}

#[test]
fn empty_cart_prices_to_zero_with_no_promo_applied() -> TestResult {
    let fixture = fixture()?;

    let quote = CheckoutQuote::assemble(&CheckoutRequest {
        cart: &Cart::new(),
        catalog: &fixture.catalog,
        offers: &fixture.offers,
        promo: fixture.promo("SUMMER10"),
        zones: &fixture.zones,
        city: None,
        delivery: None,
        placed_at: afternoon()?,
    })?;

    assert_eq!(quote.subtotal(), Money::from_minor(0, BDT));
    assert_eq!(quote.promo_discount(), Money::from_minor(0, BDT));
    assert_eq!(quote.total(), Money::from_minor(0, BDT));
    assert_eq!(quote.item_count(), 0);

    Ok(())
}
