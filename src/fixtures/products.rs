//! Product Fixtures

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{BDT, Currency, EUR, USD},
};
use serde::Deserialize;

use crate::{
    discounts::RegularDiscount,
    fixtures::FixtureError,
    products::{Catalog, Category, Product, ProductId},
};

/// Wrapper for a catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Currency code every product is priced in (e.g. "BDT")
    pub currency: String,

    /// Map of fixture key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Document-store product id
    pub id: String,

    /// Product name
    pub name: String,

    /// Merchandising category
    pub category: String,

    /// Regular price (e.g. "2400 BDT")
    pub price: String,

    /// Standing discount, if any
    pub discount: Option<DiscountFixture>,
}

/// Standing discount in YAML
#[derive(Debug, Deserialize)]
pub struct DiscountFixture {
    /// Discount kind: "percentage" or "flat"
    pub kind: String,

    /// Percentage (e.g. "20%") or flat amount (e.g. "150 BDT")
    pub value: String,
}

impl CatalogFixture {
    /// Build a catalog from the fixture.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the currency code is unknown, a price
    /// or discount fails to parse, or a product is priced in a foreign
    /// currency.
    pub fn into_catalog(self) -> Result<Catalog<'static>, FixtureError> {
        let currency = parse_currency(&self.currency)?;
        let mut catalog = Catalog::new(currency);

        for fixture in self.products.into_values() {
            catalog.insert(Product::try_from(fixture)?)?;
        }

        Ok(catalog)
    }
}

impl TryFrom<ProductFixture> for Product<'static> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        let discount = fixture
            .discount
            .map(|discount| discount.into_regular_discount())
            .transpose()?
            .flatten();

        Ok(Product {
            id: ProductId::new(fixture.id),
            name: fixture.name,
            category: Category::new(fixture.category),
            regular_price: Money::from_minor(minor_units, currency),
            discount,
        })
    }
}

impl DiscountFixture {
    /// Convert into a standing discount. Zero-valued discounts normalise to
    /// `None`, matching how the source data encodes "no discount".
    fn into_regular_discount(self) -> Result<Option<RegularDiscount<'static>>, FixtureError> {
        match self.kind.to_ascii_lowercase().as_str() {
            "percentage" => {
                let percent = parse_percentage(&self.value)?;

                if percent == Percentage::from(0.0) {
                    return Ok(None);
                }

                Ok(Some(RegularDiscount::Percentage(percent)))
            }
            "flat" => {
                let (minor_units, currency) = parse_price(&self.value)?;

                if minor_units == 0 {
                    return Ok(None);
                }

                Ok(Some(RegularDiscount::Flat(Money::from_minor(
                    minor_units,
                    currency,
                ))))
            }
            other => Err(FixtureError::UnknownDiscountKind(other.to_string())),
        }
    }
}

/// Resolve a currency code to an ISO currency.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for codes outside the supported
/// set.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "BDT" => Ok(BDT),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse a price string (e.g. "2400 BDT") into minor units and currency.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, parse_currency(currency_code)?))
}

/// Parse a percentage string (e.g. "15%" or "0.15") into a `Percentage`.
///
/// # Errors
///
/// Returns an error if the string cannot be parsed.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        return Ok(Percentage::from(value / 100.0));
    }

    let value = trimmed
        .parse::<f64>()
        .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

    Ok(Percentage::from(value))
}
