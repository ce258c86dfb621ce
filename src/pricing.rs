//! Pricing
//!
//! Unit prices and cart subtotals. A live special offer suppresses the
//! product's standing discount and leaves the unit price at the regular
//! price; the offer's value is applied later as a line discount, once the
//! subtotal is known.
//!
//! Discount arithmetic is deliberately permissive: a flat discount larger
//! than the price yields a negative unit price, exactly as the source data
//! would have it. Missing catalog entries, by contrast, are hard errors —
//! a cart line that cannot be priced poisons the whole computation rather
//! than silently contributing nothing.

use chrono::{DateTime, Utc};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    cart::Cart,
    discounts::{DiscountError, RegularDiscount, percent_of_minor},
    offers::{SpecialOffer, has_live_offer},
    products::{Catalog, Product, ProductId},
};

/// Errors raised while pricing a cart.
#[derive(Debug, Error)]
pub enum PricingError {
    /// A cart line references a product missing from the catalog.
    #[error("cart references unknown product {0}")]
    UnknownProduct(ProductId),

    /// Minor-unit arithmetic overflowed while extending a line.
    #[error("line total overflowed for product {0}")]
    LineOverflow(ProductId),

    /// Errors bubbled up from discount arithmetic.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Unit price of a product under the given offers at `now`.
///
/// - A live special offer targeting the product forces the regular price;
///   the offer's value is applied separately as a line discount.
/// - Otherwise the standing discount applies: percentage discounts take a
///   share off the regular price, flat discounts subtract their amount.
/// - With no discount at all, the regular price stands.
///
/// # Errors
///
/// Returns a [`PricingError`] if percentage or money arithmetic fails.
pub fn final_price<'a>(
    product: &Product<'a>,
    offers: &[SpecialOffer<'a>],
    now: DateTime<Utc>,
) -> Result<Money<'a, Currency>, PricingError> {
    if has_live_offer(product, offers, now) {
        return Ok(product.regular_price);
    }

    match &product.discount {
        None => Ok(product.regular_price),
        Some(RegularDiscount::Percentage(percent)) => {
            let regular_minor = product.regular_price.to_minor_units();
            let discount_minor = percent_of_minor(percent, regular_minor)?;
            let final_minor = regular_minor
                .checked_sub(discount_minor)
                .ok_or(DiscountError::AmountOverflow)?;

            Ok(Money::from_minor(
                final_minor,
                product.regular_price.currency(),
            ))
        }
        Some(RegularDiscount::Flat(amount)) => Ok(product.regular_price.sub(*amount)?),
    }
}

/// Extend a unit price across a line quantity.
///
/// # Errors
///
/// Returns [`PricingError::LineOverflow`] if the multiplication overflows
/// minor-unit arithmetic.
pub fn extend<'a>(
    product_id: &ProductId,
    unit_price: &Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    let line_minor = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or_else(|| PricingError::LineOverflow(product_id.clone()))?;

    Ok(Money::from_minor(line_minor, unit_price.currency()))
}

/// Cart subtotal: the sum of `final_price × quantity` over all lines.
///
/// An empty cart subtotals to exactly zero in the catalog currency.
///
/// # Errors
///
/// Returns [`PricingError::UnknownProduct`] for a line whose product is
/// missing from the catalog, or a wrapped arithmetic error.
pub fn subtotal<'a>(
    cart: &Cart,
    catalog: &Catalog<'a>,
    offers: &[SpecialOffer<'a>],
    now: DateTime<Utc>,
) -> Result<Money<'a, Currency>, PricingError> {
    let zero = Money::from_minor(0, catalog.currency());

    cart.lines().iter().try_fold(zero, |acc, line| {
        let product = catalog
            .lookup(line.product())
            .ok_or_else(|| PricingError::UnknownProduct(line.product().clone()))?;

        let unit_price = final_price(product, offers, now)?;
        let line_total = extend(line.product(), &unit_price, line.quantity())?;

        Ok(acc.add(line_total)?)
    })
}
