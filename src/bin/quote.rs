//! Demo CLI: price a cart against YAML fixtures and print the quotation.

use std::{error::Error, path::PathBuf};

use chrono::Utc;
use clap::Parser;
use tabled::{Table, Tabled, settings::Style};
use tracing_subscriber::EnvFilter;

use jamdani::{
    calendar::store_offset,
    cart::{Cart, CartLine},
    fixtures::Fixture,
    products::ProductId,
    quote::{CheckoutQuote, CheckoutRequest},
    shipping::DeliveryMethod,
};

/// Arguments for the quote demo
#[derive(Debug, Parser)]
#[command(name = "quote", about = "Price a cart against fixture data")]
struct Args {
    /// Catalog fixture (YAML)
    #[clap(long)]
    products: PathBuf,

    /// Offers fixture (YAML)
    #[clap(long)]
    offers: Option<PathBuf>,

    /// Promo-codes fixture (YAML)
    #[clap(long)]
    promos: Option<PathBuf>,

    /// Shipping-zones fixture (YAML)
    #[clap(long)]
    zones: Option<PathBuf>,

    /// Cart lines as `PRODUCT_ID=QTY` (repeatable)
    #[clap(long = "line", value_name = "ID=QTY")]
    lines: Vec<String>,

    /// Promo code to redeem
    #[clap(long)]
    promo: Option<String>,

    /// Destination city
    #[clap(long)]
    city: Option<String>,

    /// Delivery method (`standard` or `express`)
    #[clap(long)]
    delivery: Option<String>,
}

/// One rendered line of the quotation table.
#[derive(Debug, Tabled)]
struct QuoteRow {
    /// Product name
    #[tabled(rename = "Product")]
    product: String,

    /// Selected quantity
    #[tabled(rename = "Qty")]
    quantity: u32,

    /// Unit price
    #[tabled(rename = "Unit")]
    unit_price: String,

    /// Extended line total
    #[tabled(rename = "Line total")]
    line_total: String,

    /// Special-offer discount on the line
    #[tabled(rename = "Offer discount")]
    offer_discount: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let fixture = Fixture::from_paths(
        &args.products,
        args.offers.as_deref(),
        args.promos.as_deref(),
        args.zones.as_deref(),
    )?;

    let cart = parse_cart(&args.lines)?;

    let promo = match args.promo.as_deref() {
        Some(code) => Some(
            fixture
                .promo(code)
                .ok_or_else(|| format!("unknown promo code: {code}"))?,
        ),
        None => None,
    };

    let delivery = args
        .delivery
        .as_deref()
        .map(str::parse::<DeliveryMethod>)
        .transpose()?;

    let quote = CheckoutQuote::assemble(&CheckoutRequest {
        cart: &cart,
        catalog: &fixture.catalog,
        offers: &fixture.offers,
        promo,
        zones: &fixture.zones,
        city: args.city.as_deref(),
        delivery,
        placed_at: Utc::now().with_timezone(&store_offset()),
    })?;

    let rows: Vec<QuoteRow> = quote
        .lines()
        .iter()
        .map(|line| QuoteRow {
            product: line.name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            line_total: line.line_total.to_string(),
            offer_discount: line.offer_discount.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());

    println!("{table}");
    println!();
    println!("Items:          {}", quote.item_count());
    println!("Subtotal:       {}", quote.subtotal());
    println!("Promo discount: {}", quote.promo_discount());
    println!("Offer discount: {}", quote.offer_discount());
    println!("Shipping:       {}", quote.shipping_charge());
    println!("Total:          {}", quote.total());

    if let Some(expected) = quote.expected_delivery() {
        println!("Delivery by:    {expected}");
    }

    Ok(())
}

/// Parse `--line PRODUCT_ID=QTY` arguments into a cart.
fn parse_cart(raw_lines: &[String]) -> Result<Cart, Box<dyn Error>> {
    let mut cart = Cart::new();

    for raw in raw_lines {
        let (id, quantity) = raw
            .split_once('=')
            .ok_or_else(|| format!("expected ID=QTY, got: {raw}"))?;

        let quantity: u32 = quantity
            .trim()
            .parse()
            .map_err(|_err| format!("invalid quantity in: {raw}"))?;

        cart.push(CartLine::new(ProductId::new(id.trim()), quantity)?);
    }

    Ok(cart)
}
