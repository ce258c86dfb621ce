//! Offer & Promo Fixtures

use rusty_money::Money;
use serde::Deserialize;

use crate::{
    fixtures::{
        FixtureError, parse_date,
        products::{parse_percentage, parse_price},
    },
    offers::{OfferDiscount, OfferScope, SpecialOffer, SubtotalGate},
    products::{Category, ProductId},
    promos::{PromoCode, PromoDiscount},
};

/// Wrapper for special offers in YAML. Document order is the published
/// priority order: the first live offer targeting a product wins.
#[derive(Debug, Deserialize)]
pub struct OffersFixture {
    /// Offers in priority order
    pub offers: Vec<OfferFixture>,
}

/// Special Offer Fixture
#[derive(Debug, Deserialize)]
pub struct OfferFixture {
    /// Campaign name
    pub name: String,

    /// Whether the offer is switched on
    pub active: bool,

    /// Last day the offer runs (e.g. "2026-09-30")
    pub expires_on: String,

    /// Targeted product ids
    #[serde(default)]
    pub products: Vec<String>,

    /// Targeted categories
    #[serde(default)]
    pub categories: Vec<String>,

    /// Discount granted on qualifying lines
    pub discount: OfferDiscountFixture,

    /// Per-line discount cap (e.g. "300 BDT"); zero or absent = uncapped
    pub max_amount: Option<String>,

    /// Cart-subtotal threshold; absent = not applicable
    pub min_subtotal: Option<String>,
}

/// Offer discount in YAML
#[derive(Debug, Deserialize)]
pub struct OfferDiscountFixture {
    /// Discount kind: "percentage" or "amount"
    pub kind: String,

    /// Percentage (e.g. "10%") or amount (e.g. "300 BDT")
    pub value: String,
}

/// Wrapper for promo codes in YAML
#[derive(Debug, Deserialize)]
pub struct PromosFixture {
    /// Promo codes
    pub promos: Vec<PromoFixture>,
}

/// Promo Code Fixture
#[derive(Debug, Deserialize)]
pub struct PromoFixture {
    /// Customer-entered code
    pub code: String,

    /// Whether the code is switched on
    pub active: bool,

    /// Last day the code runs (e.g. "2026-09-30")
    pub expires_on: String,

    /// Minimum cart subtotal (e.g. "1000 BDT")
    pub min_subtotal: String,

    /// Discount granted on the subtotal
    pub discount: OfferDiscountFixture,

    /// Discount cap (e.g. "300 BDT"); zero or absent = uncapped
    pub max_amount: Option<String>,
}

impl OffersFixture {
    /// Convert into domain offers, preserving document order.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if any date, price or percentage fails to
    /// parse.
    pub fn into_offers(self) -> Result<Vec<SpecialOffer<'static>>, FixtureError> {
        self.offers.into_iter().map(SpecialOffer::try_from).collect()
    }
}

impl TryFrom<OfferFixture> for SpecialOffer<'static> {
    type Error = FixtureError;

    fn try_from(fixture: OfferFixture) -> Result<Self, Self::Error> {
        let scope = OfferScope::new(
            fixture.products.into_iter().map(ProductId::new),
            fixture.categories.into_iter().map(Category::new),
        );

        let gate = match fixture.min_subtotal.as_deref() {
            None => SubtotalGate::NotApplicable,
            Some(raw) => {
                let (minor, currency) = parse_price(raw)?;
                SubtotalGate::AtLeast(Money::from_minor(minor, currency))
            }
        };

        Ok(Self {
            name: fixture.name,
            active: fixture.active,
            expires_on: parse_date(&fixture.expires_on)?,
            scope,
            discount: fixture.discount.into_offer_discount()?,
            cap: parse_cap(fixture.max_amount.as_deref())?,
            gate,
        })
    }
}

impl PromosFixture {
    /// Convert into domain promo codes.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if any date, price or percentage fails to
    /// parse.
    pub fn into_promos(self) -> Result<Vec<PromoCode<'static>>, FixtureError> {
        self.promos.into_iter().map(PromoCode::try_from).collect()
    }
}

impl TryFrom<PromoFixture> for PromoCode<'static> {
    type Error = FixtureError;

    fn try_from(fixture: PromoFixture) -> Result<Self, Self::Error> {
        let (min_minor, currency) = parse_price(&fixture.min_subtotal)?;

        let discount = match fixture.discount.into_offer_discount()? {
            OfferDiscount::Percentage(percent) => PromoDiscount::Percentage(percent),
            OfferDiscount::Amount(amount) => PromoDiscount::Amount(amount),
        };

        Ok(Self {
            code: fixture.code,
            active: fixture.active,
            expires_on: parse_date(&fixture.expires_on)?,
            min_subtotal: Money::from_minor(min_minor, currency),
            discount,
            cap: parse_cap(fixture.max_amount.as_deref())?,
        })
    }
}

impl OfferDiscountFixture {
    /// Convert into an offer discount.
    fn into_offer_discount(self) -> Result<OfferDiscount<'static>, FixtureError> {
        match self.kind.to_ascii_lowercase().as_str() {
            "percentage" => Ok(OfferDiscount::Percentage(parse_percentage(&self.value)?)),
            "amount" => {
                let (minor, currency) = parse_price(&self.value)?;
                Ok(OfferDiscount::Amount(Money::from_minor(minor, currency)))
            }
            other => Err(FixtureError::UnknownDiscountKind(other.to_string())),
        }
    }
}

/// Parse an optional cap; zero or absent means uncapped.
fn parse_cap(raw: Option<&str>) -> Result<Option<Money<'static, rusty_money::iso::Currency>>, FixtureError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let (minor, currency) = parse_price(raw)?;

    if minor == 0 {
        return Ok(None);
    }

    Ok(Some(Money::from_minor(minor, currency)))
}
