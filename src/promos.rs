//! Promo Codes
//!
//! A promo code is a cart-level, customer-entered discount with its own
//! eligibility window, minimum-subtotal threshold and cap. Unlike special
//! offers, promo codes never touch individual lines; they discount the cart
//! subtotal as a whole.

use chrono::{DateTime, NaiveDate, Utc};
use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};

use crate::{
    calendar::end_of_day,
    discounts::{DiscountError, capped, percentage_of},
};

/// The discount a promo code grants on the cart subtotal.
#[derive(Debug, Copy, Clone)]
pub enum PromoDiscount<'a> {
    /// Fixed amount off the subtotal.
    Amount(Money<'a, Currency>),

    /// Percentage of the subtotal.
    Percentage(Percentage),
}

/// Promo Code
#[derive(Debug, Clone)]
pub struct PromoCode<'a> {
    /// Customer-entered code.
    pub code: String,

    /// Whether the code is switched on.
    pub active: bool,

    /// Last day the code runs, inclusive through end of day on the
    /// storefront clock.
    pub expires_on: NaiveDate,

    /// Minimum cart subtotal required to redeem the code.
    pub min_subtotal: Money<'a, Currency>,

    /// Discount granted on the subtotal.
    pub discount: PromoDiscount<'a>,

    /// Optional cap on the discount. Zero means uncapped.
    pub cap: Option<Money<'a, Currency>>,
}

impl<'a> PromoCode<'a> {
    /// Check whether the code is live at `now`: switched on and not yet past
    /// the end of its expiry day.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.active && now <= end_of_day(self.expires_on)
    }

    /// Check whether the code can be redeemed against `subtotal` at `now`.
    pub fn is_eligible(&self, subtotal: &Money<'a, Currency>, now: DateTime<Utc>) -> bool {
        self.is_live(now) && subtotal.to_minor_units() >= self.min_subtotal.to_minor_units()
    }

    /// The discount the code grants on `subtotal`, before any eligibility
    /// check. Clamped at the code's cap.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if percentage arithmetic overflows.
    pub fn discount_on(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        let discount = match &self.discount {
            PromoDiscount::Amount(amount) => *amount,
            PromoDiscount::Percentage(percent) => percentage_of(percent, subtotal)?,
        };

        Ok(capped(discount, self.cap.as_ref()))
    }
}

/// Discount a promo code contributes to a cart with the given subtotal.
///
/// An ineligible code (switched off, expired, or below its minimum subtotal)
/// contributes zero.
///
/// # Errors
///
/// Returns a [`DiscountError`] if percentage arithmetic overflows.
pub fn promo_discount<'a>(
    promo: &PromoCode<'a>,
    subtotal: &Money<'a, Currency>,
    now: DateTime<Utc>,
) -> Result<Money<'a, Currency>, DiscountError> {
    if !promo.is_eligible(subtotal, now) {
        return Ok(Money::from_minor(0, subtotal.currency()));
    }

    promo.discount_on(subtotal)
}
