//! Shipping Zone Fixtures

use rustc_hash::FxHashMap;
use rusty_money::Money;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, products::parse_price},
    shipping::{DeliveryMethod, ShippingZone, ZoneSchedule},
};

/// Wrapper for shipping zones in YAML
#[derive(Debug, Deserialize)]
pub struct ZonesFixture {
    /// Zones in lookup order
    pub zones: Vec<ZoneFixture>,
}

/// Shipping Zone Fixture
#[derive(Debug, Deserialize)]
pub struct ZoneFixture {
    /// Zone display name
    pub name: String,

    /// Cities the zone serves
    pub cities: Vec<String>,

    /// Charge per delivery-method key (e.g. `STANDARD: "120 BDT"`)
    #[serde(default)]
    pub charges: FxHashMap<String, String>,

    /// Duration per delivery-method key (e.g. `STANDARD: "2-3"`)
    #[serde(default)]
    pub durations: FxHashMap<String, String>,
}

impl ZonesFixture {
    /// Convert into domain zones, preserving document order.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if a delivery-method key or charge fails
    /// to parse.
    pub fn into_zones(self) -> Result<Vec<ShippingZone<'static>>, FixtureError> {
        self.zones.into_iter().map(ShippingZone::try_from).collect()
    }
}

impl TryFrom<ZoneFixture> for ShippingZone<'static> {
    type Error = FixtureError;

    fn try_from(fixture: ZoneFixture) -> Result<Self, Self::Error> {
        let mut schedule = ZoneSchedule::new();

        for (key, price) in &fixture.charges {
            let method: DeliveryMethod = key.parse()?;
            let (minor, currency) = parse_price(price)?;

            schedule.set_charge(method, Money::from_minor(minor, currency));
        }

        for (key, duration) in &fixture.durations {
            let method: DeliveryMethod = key.parse()?;

            schedule.set_duration(method, duration.clone());
        }

        Ok(Self::new(fixture.name, fixture.cities, schedule))
    }
}
