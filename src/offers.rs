//! Special Offers
//!
//! A special offer is a time-bounded discount targeting products by id or by
//! category. A live offer overrides a product's standing discount: the unit
//! price stays at the regular price and the offer's value is applied as a
//! separate line discount at quotation time.
//!
//! When several offers target the same product, the first live offer in the
//! caller-supplied order wins. That ordering is part of the contract, not an
//! accident of collection order: callers pass offers in their published
//! priority order and this module walks the slice front to back.

use chrono::{DateTime, NaiveDate, Utc};
use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    calendar::end_of_day,
    discounts::{DiscountError, capped, percent_of_minor},
    products::{Category, Product, ProductId},
};

/// Products a special offer applies to, by id or by category.
///
/// Both sets are kept sorted and deduplicated so membership checks are binary
/// searches.
#[derive(Debug, Clone, Default)]
pub struct OfferScope {
    product_ids: SmallVec<[ProductId; 4]>,
    categories: SmallVec<[Category; 4]>,
}

impl OfferScope {
    /// Create a scope from product ids and categories.
    pub fn new(
        product_ids: impl IntoIterator<Item = ProductId>,
        categories: impl IntoIterator<Item = Category>,
    ) -> Self {
        let mut product_ids: SmallVec<[ProductId; 4]> = product_ids.into_iter().collect();
        let mut categories: SmallVec<[Category; 4]> = categories.into_iter().collect();

        product_ids.sort();
        product_ids.dedup();
        categories.sort();
        categories.dedup();

        Self {
            product_ids,
            categories,
        }
    }

    /// Scope targeting only the given product ids.
    pub fn products(product_ids: impl IntoIterator<Item = ProductId>) -> Self {
        Self::new(product_ids, [])
    }

    /// Scope targeting only the given categories.
    pub fn categories(categories: impl IntoIterator<Item = Category>) -> Self {
        Self::new([], categories)
    }

    /// Check whether the scope targets a product, by id or by category.
    pub fn targets(&self, product: &Product<'_>) -> bool {
        self.product_ids.binary_search(&product.id).is_ok()
            || self.categories.binary_search(&product.category).is_ok()
    }

    /// Check if the scope targets nothing at all.
    pub fn is_empty(&self) -> bool {
        self.product_ids.is_empty() && self.categories.is_empty()
    }
}

/// The discount a special offer grants on a qualifying cart line.
#[derive(Debug, Copy, Clone)]
pub enum OfferDiscount<'a> {
    /// Percentage of the line total (regular price × quantity).
    Percentage(Percentage),

    /// Fixed amount per line, regardless of quantity.
    Amount(Money<'a, Currency>),
}

/// Cart-subtotal threshold gating an offer's line discount.
///
/// The gate only applies to the line-discount pass; unit pricing ignores it
/// (the subtotal is not yet known when unit prices are computed).
#[derive(Debug, Copy, Clone)]
pub enum SubtotalGate<'a> {
    /// The offer discounts qualifying lines unconditionally.
    NotApplicable,

    /// The offer discounts qualifying lines only once the cart subtotal
    /// reaches this amount.
    AtLeast(Money<'a, Currency>),
}

impl SubtotalGate<'_> {
    /// Evaluate the gate against a cart subtotal.
    pub fn passes(&self, subtotal: &Money<'_, Currency>) -> bool {
        match self {
            Self::NotApplicable => true,
            Self::AtLeast(threshold) => {
                subtotal.to_minor_units() >= threshold.to_minor_units()
            }
        }
    }
}

/// Special Offer
#[derive(Debug, Clone)]
pub struct SpecialOffer<'a> {
    /// Display name of the campaign.
    pub name: String,

    /// Whether the offer is switched on. An inactive offer is never live,
    /// whatever its expiry date.
    pub active: bool,

    /// Last day the offer runs, inclusive through end of day on the
    /// storefront clock.
    pub expires_on: NaiveDate,

    /// Products the offer targets.
    pub scope: OfferScope,

    /// Discount granted on qualifying lines.
    pub discount: OfferDiscount<'a>,

    /// Optional cap on the discount per line. Zero means uncapped.
    pub cap: Option<Money<'a, Currency>>,

    /// Cart-subtotal threshold for the line-discount pass.
    pub gate: SubtotalGate<'a>,
}

impl<'a> SpecialOffer<'a> {
    /// Check whether the offer is live at `now`: switched on and not yet past
    /// the end of its expiry day.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.active && now <= end_of_day(self.expires_on)
    }

    /// Check whether the offer targets a product, by id or by category.
    pub fn targets(&self, product: &Product<'_>) -> bool {
        self.scope.targets(product)
    }

    /// Discount this offer grants on a cart line of `quantity` units of
    /// `product`.
    ///
    /// The line total is `regular_price × quantity`. Percentage discounts
    /// scale with the line total; amount discounts are flat per line and are
    /// not multiplied by the quantity. The result is clamped at the offer's
    /// cap.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if minor-unit arithmetic overflows.
    pub fn line_discount(
        &self,
        product: &Product<'a>,
        quantity: u32,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        let currency = product.regular_price.currency();
        let line_minor = product
            .regular_price
            .to_minor_units()
            .checked_mul(i64::from(quantity))
            .ok_or(DiscountError::AmountOverflow)?;

        let discount_minor = match &self.discount {
            OfferDiscount::Percentage(percent) => percent_of_minor(percent, line_minor)?,
            OfferDiscount::Amount(amount) => amount.to_minor_units(),
        };

        Ok(capped(
            Money::from_minor(discount_minor, currency),
            self.cap.as_ref(),
        ))
    }
}

/// First live offer targeting `product`, ignoring subtotal gates.
///
/// This is the selection unit pricing uses: whether an offer is live decides
/// whether the standing discount is suppressed, and the cart subtotal is not
/// yet known at that point.
pub fn live_offer_for<'a, 'b>(
    product: &Product<'a>,
    offers: &'b [SpecialOffer<'a>],
    now: DateTime<Utc>,
) -> Option<&'b SpecialOffer<'a>> {
    offers
        .iter()
        .find(|offer| offer.is_live(now) && offer.targets(product))
}

/// First live offer targeting `product` whose subtotal gate passes.
///
/// This is the selection the line-discount pass uses once the cart subtotal
/// is known.
pub fn discountable_offer_for<'a, 'b>(
    product: &Product<'a>,
    offers: &'b [SpecialOffer<'a>],
    subtotal: &Money<'a, Currency>,
    now: DateTime<Utc>,
) -> Option<&'b SpecialOffer<'a>> {
    offers.iter().find(|offer| {
        offer.is_live(now) && offer.targets(product) && offer.gate.passes(subtotal)
    })
}

/// Check whether any live offer targets the product.
pub fn has_live_offer(
    product: &Product<'_>,
    offers: &[SpecialOffer<'_>],
    now: DateTime<Utc>,
) -> bool {
    live_offer_for(product, offers, now).is_some()
}

/// Check whether the product is discounted at all: a standing discount or a
/// live special offer.
pub fn has_any_discount(
    product: &Product<'_>,
    offers: &[SpecialOffer<'_>],
    now: DateTime<Utc>,
) -> bool {
    product.discount.is_some() || has_live_offer(product, offers, now)
}

/// Check whether the product's only discount is its standing one.
///
/// Standing discounts and special offers are mutually exclusive: a live
/// offer always wins, so this is true only when a standing discount exists
/// and no live offer targets the product.
pub fn has_only_regular_discount(
    product: &Product<'_>,
    offers: &[SpecialOffer<'_>],
    now: DateTime<Utc>,
) -> bool {
    product.discount.is_some() && !has_live_offer(product, offers, now)
}
