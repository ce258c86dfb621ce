//! Discount Arithmetic
//!
//! Shared percentage and cap arithmetic used by standing product discounts,
//! special offers and promo codes. All monetary maths happens in minor units
//! with midpoint-away-from-zero rounding.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Minor-unit arithmetic overflowed.
    #[error("discount amount overflowed minor-unit arithmetic")]
    AmountOverflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A product's standing discount, applied only when no special offer is live.
#[derive(Debug, Copy, Clone)]
pub enum RegularDiscount<'a> {
    /// Take a percentage off the regular price (e.g. "20% off").
    Percentage(Percentage),

    /// Take a fixed amount off the regular price (e.g. "৳150 off").
    Flat(Money<'a, Currency>),
}

/// Calculate a percentage of a minor-unit amount.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the multiplication
/// overflows or the result cannot be represented in minor units.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Calculate a percentage of a monetary amount.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the percentage cannot be
/// applied safely.
pub fn percentage_of<'a>(
    percent: &Percentage,
    amount: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, DiscountError> {
    let minor = percent_of_minor(percent, amount.to_minor_units())?;

    Ok(Money::from_minor(minor, amount.currency()))
}

/// Clamp a discount at an optional cap.
///
/// A missing or non-positive cap leaves the discount unchanged; source data
/// encodes "uncapped" as a zero `maxAmount`.
pub fn capped<'a>(
    discount: Money<'a, Currency>,
    cap: Option<&Money<'a, Currency>>,
) -> Money<'a, Currency> {
    match cap {
        Some(cap) if cap.to_minor_units() > 0 && discount.to_minor_units() > cap.to_minor_units() => {
            *cap
        }
        _ => discount,
    }
}
