//! Shipping
//!
//! Shipping zones group cities that share a charge and delivery-duration
//! schedule per delivery method. Charges fall back to zero whenever the
//! lookup cannot be completed — no city, no matching zone, or no schedule
//! entry — mirroring how the storefront treats unroutable destinations.
//!
//! Dhaka is the exception: deliveries inside the capital require an explicit
//! delivery-method choice, so a Dhaka lookup without one yields no charge
//! and no estimate. Every other city defaults to standard delivery.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::calendar::{long_date, plus_days, plus_hours};

/// City that requires an explicit delivery-method selection.
pub const DHAKA: &str = "Dhaka";

/// Errors raised while resolving shipping charges and delivery estimates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShippingError {
    /// A delivery-method key matched neither `STANDARD` nor `EXPRESS`.
    #[error("unknown delivery method: {0}")]
    UnknownDeliveryMethod(String),

    /// A duration string could not be read as a number or numeric range.
    #[error("unparseable delivery duration: {0}")]
    InvalidDuration(String),

    /// Adding the delivery duration overflowed the calendar.
    #[error("delivery estimate overflowed the calendar")]
    DateOverflow,
}

/// How an order travels to the customer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DeliveryMethod {
    /// Regular delivery; durations are counted in days.
    Standard,

    /// Same-day-class delivery; durations are counted in hours.
    Express,
}

impl DeliveryMethod {
    /// Wire key used in zone schedules (`"STANDARD"` / `"EXPRESS"`).
    pub fn as_key(self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::Express => "EXPRESS",
        }
    }
}

impl FromStr for DeliveryMethod {
    type Err = ShippingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "STANDARD" => Ok(Self::Standard),
            "EXPRESS" => Ok(Self::Express),
            _ => Err(ShippingError::UnknownDeliveryMethod(raw.to_string())),
        }
    }
}

/// Per-method charge and duration schedule for a zone.
#[derive(Debug, Clone, Default)]
pub struct ZoneSchedule<'a> {
    charges: FxHashMap<DeliveryMethod, Money<'a, Currency>>,
    durations: FxHashMap<DeliveryMethod, String>,
}

impl<'a> ZoneSchedule<'a> {
    /// Create an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the charge for a delivery method.
    pub fn set_charge(&mut self, method: DeliveryMethod, charge: Money<'a, Currency>) {
        self.charges.insert(method, charge);
    }

    /// Record the duration for a delivery method. Durations may be single
    /// numbers (`"4"`) or ranges (`"2-3"`).
    pub fn set_duration(&mut self, method: DeliveryMethod, duration: impl Into<String>) {
        self.durations.insert(method, duration.into());
    }

    /// Charge for a delivery method, if scheduled.
    pub fn charge(&self, method: DeliveryMethod) -> Option<&Money<'a, Currency>> {
        self.charges.get(&method)
    }

    /// Duration for a delivery method, if scheduled.
    pub fn duration(&self, method: DeliveryMethod) -> Option<&str> {
        self.durations.get(&method).map(String::as_str)
    }
}

/// Shipping Zone
#[derive(Debug, Clone)]
pub struct ShippingZone<'a> {
    /// Zone display name.
    pub name: String,

    /// Cities the zone serves, matched by exact name.
    cities: SmallVec<[String; 4]>,

    /// Charge and duration schedule.
    pub schedule: ZoneSchedule<'a>,
}

impl<'a> ShippingZone<'a> {
    /// Create a zone serving the given cities.
    pub fn new(
        name: impl Into<String>,
        cities: impl IntoIterator<Item = String>,
        schedule: ZoneSchedule<'a>,
    ) -> Self {
        let mut cities: SmallVec<[String; 4]> = cities.into_iter().collect();
        cities.sort();
        cities.dedup();

        Self {
            name: name.into(),
            cities,
            schedule,
        }
    }

    /// Check whether the zone serves a city.
    pub fn serves(&self, city: &str) -> bool {
        self.cities.binary_search_by(|candidate| candidate.as_str().cmp(city)).is_ok()
    }

    /// Cities the zone serves, sorted.
    pub fn cities(&self) -> &[String] {
        &self.cities
    }
}

/// Resolve the delivery method actually used for a destination, if any.
///
/// `None` means the destination cannot be routed yet: either no city was
/// selected, or the city is Dhaka and no explicit method was chosen.
fn effective_method(city: Option<&str>, method: Option<DeliveryMethod>) -> Option<DeliveryMethod> {
    let city = city?;

    match method {
        Some(method) => Some(method),
        None if city == DHAKA => None,
        None => Some(DeliveryMethod::Standard),
    }
}

/// First zone serving the city, in the caller-supplied order.
fn zone_for<'a, 'b>(city: &str, zones: &'b [ShippingZone<'a>]) -> Option<&'b ShippingZone<'a>> {
    zones.iter().find(|zone| zone.serves(city))
}

/// Shipping charge for a destination.
///
/// Zero when no city is selected, when Dhaka is selected without an explicit
/// delivery method, when no zone serves the city, or when the zone schedules
/// no charge for the method.
pub fn shipping_charge<'a>(
    city: Option<&str>,
    method: Option<DeliveryMethod>,
    zones: &[ShippingZone<'a>],
    currency: &'static Currency,
) -> Money<'a, Currency> {
    let zero = Money::from_minor(0, currency);

    let Some(effective) = effective_method(city, method) else {
        return zero;
    };
    let Some(city) = city else {
        return zero;
    };

    zone_for(city, zones)
        .and_then(|zone| zone.schedule.charge(effective))
        .copied()
        .unwrap_or(zero)
}

/// Delivery duration for a destination, mirroring the charge lookup.
pub fn delivery_duration(
    city: Option<&str>,
    method: Option<DeliveryMethod>,
    zones: &[ShippingZone<'_>],
) -> Option<String> {
    let effective = effective_method(city, method)?;

    zone_for(city?, zones)
        .and_then(|zone| zone.schedule.duration(effective))
        .map(ToString::to_string)
}

/// Parse a duration string into a whole number of units.
///
/// Ranges take their maximum endpoint: `"2-3"` parses as 3. The unit (days
/// or hours) depends on the delivery method.
///
/// # Errors
///
/// Returns [`ShippingError::InvalidDuration`] when no numeric endpoint can
/// be read.
pub fn parse_duration(raw: &str) -> Result<i64, ShippingError> {
    let invalid = || ShippingError::InvalidDuration(raw.to_string());

    if raw.contains('-') {
        return raw
            .split('-')
            .map(str::trim)
            .map(str::parse::<i64>)
            .try_fold(None::<i64>, |acc, endpoint| {
                let endpoint = endpoint.map_err(|_err| invalid())?;
                Ok(Some(acc.map_or(endpoint, |max: i64| max.max(endpoint))))
            })?
            .ok_or_else(invalid);
    }

    raw.trim().parse::<i64>().map_err(|_err| invalid())
}

/// Estimated delivery date for an order placed at `placed_at`.
///
/// Express deliveries add the duration in hours; standard deliveries add it
/// in days. The result is formatted as a long-form date (`"Month DD, YYYY"`)
/// on the storefront clock.
///
/// # Errors
///
/// Returns a [`ShippingError`] if the duration cannot be parsed or the
/// addition overflows the calendar.
pub fn expected_delivery_date(
    placed_at: DateTime<FixedOffset>,
    method: DeliveryMethod,
    duration: &str,
) -> Result<String, ShippingError> {
    let units = parse_duration(duration)?;

    let arrival = match method {
        DeliveryMethod::Express => plus_hours(placed_at, units),
        DeliveryMethod::Standard => plus_days(placed_at, units),
    }
    .ok_or(ShippingError::DateOverflow)?;

    Ok(long_date(arrival))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::BDT;
    use testresult::TestResult;

    use crate::calendar::parse_order_timestamp;

    use super::*;

    fn dhaka_zone<'a>() -> ShippingZone<'a> {
        let mut schedule = ZoneSchedule::new();
        schedule.set_charge(DeliveryMethod::Standard, Money::from_minor(6_000, BDT));
        schedule.set_charge(DeliveryMethod::Express, Money::from_minor(15_000, BDT));
        schedule.set_duration(DeliveryMethod::Standard, "1-2");
        schedule.set_duration(DeliveryMethod::Express, "5");

        ShippingZone::new("Dhaka Metro", [DHAKA.to_string()], schedule)
    }

    fn outstation_zone<'a>() -> ShippingZone<'a> {
        let mut schedule = ZoneSchedule::new();
        schedule.set_charge(DeliveryMethod::Standard, Money::from_minor(12_000, BDT));
        schedule.set_duration(DeliveryMethod::Standard, "2-3");

        ShippingZone::new(
            "Outstation",
            ["Chattogram".to_string(), "Sylhet".to_string()],
            schedule,
        )
    }

    #[test]
    fn no_city_means_no_charge() {
        let zones = [dhaka_zone()];

        let charge = shipping_charge(None, Some(DeliveryMethod::Express), &zones, BDT);

        assert_eq!(charge, Money::from_minor(0, BDT));
    }

    #[test]
    fn dhaka_requires_explicit_delivery_method() {
        let zones = [dhaka_zone()];

        let unrouted = shipping_charge(Some(DHAKA), None, &zones, BDT);
        let express = shipping_charge(Some(DHAKA), Some(DeliveryMethod::Express), &zones, BDT);

        assert_eq!(unrouted, Money::from_minor(0, BDT));
        assert_eq!(express, Money::from_minor(15_000, BDT));
        assert!(delivery_duration(Some(DHAKA), None, &zones).is_none());
    }

    #[test]
    fn other_cities_default_to_standard() {
        let zones = [dhaka_zone(), outstation_zone()];

        let charge = shipping_charge(Some("Sylhet"), None, &zones, BDT);
        let duration = delivery_duration(Some("Sylhet"), None, &zones);

        assert_eq!(charge, Money::from_minor(12_000, BDT));
        assert_eq!(duration.as_deref(), Some("2-3"));
    }

    #[test]
    fn unserved_city_falls_back_to_zero() {
        let zones = [dhaka_zone()];

        let charge = shipping_charge(Some("Khulna"), None, &zones, BDT);

        assert_eq!(charge, Money::from_minor(0, BDT));
        assert!(delivery_duration(Some("Khulna"), None, &zones).is_none());
    }

    #[test]
    fn unscheduled_method_falls_back_to_zero() {
        let zones = [outstation_zone()];

        let charge = shipping_charge(
            Some("Chattogram"),
            Some(DeliveryMethod::Express),
            &zones,
            BDT,
        );

        assert_eq!(charge, Money::from_minor(0, BDT));
    }

    #[test]
    fn delivery_method_keys_parse_case_insensitively() -> TestResult {
        assert_eq!("standard".parse::<DeliveryMethod>()?, DeliveryMethod::Standard);
        assert_eq!("EXPRESS".parse::<DeliveryMethod>()?, DeliveryMethod::Express);
        assert!(matches!(
            "pigeon".parse::<DeliveryMethod>(),
            Err(ShippingError::UnknownDeliveryMethod(_))
        ));

        Ok(())
    }

    #[test]
    fn duration_ranges_take_the_maximum_endpoint() -> TestResult {
        assert_eq!(parse_duration("2-3")?, 3);
        assert_eq!(parse_duration("4")?, 4);
        assert_eq!(parse_duration(" 1 - 5 ")?, 5);
        assert!(matches!(
            parse_duration("soon"),
            Err(ShippingError::InvalidDuration(_))
        ));

        Ok(())
    }

    #[test]
    fn standard_estimate_adds_days() -> TestResult {
        let placed_at = parse_order_timestamp("06-08-26 | 14:30")?;

        let estimate = expected_delivery_date(placed_at, DeliveryMethod::Standard, "2-3")?;

        assert_eq!(estimate, "August 09, 2026");

        Ok(())
    }

    #[test]
    fn express_estimate_adds_hours() -> TestResult {
        let placed_at = parse_order_timestamp("06-08-26 | 22:30")?;

        // 5 hours pushes past midnight into the next day.
        let estimate = expected_delivery_date(placed_at, DeliveryMethod::Express, "5")?;

        assert_eq!(estimate, "August 07, 2026");

        Ok(())
    }
}
