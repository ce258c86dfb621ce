//! Fixtures
//!
//! YAML-backed test and demo data: a catalog, special offers, promo codes,
//! shipping zones and a store config, loadable from strings or files.
//! Fixture structs hold raw strings; `TryFrom` conversions parse prices,
//! percentages and dates into domain types.

use std::{fs, path::Path};

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    emails::StoreConfig,
    offers::SpecialOffer,
    products::{Catalog, CatalogError, Product},
    promos::PromoCode,
    shipping::{ShippingError, ShippingZone},
};

pub mod offers;
pub mod products;
pub mod zones;

use crate::fixtures::{
    offers::{OffersFixture, PromosFixture},
    products::CatalogFixture,
    zones::ZonesFixture,
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Unknown discount kind
    #[error("Unknown discount kind: {0}")]
    UnknownDiscountKind(String),

    /// Invalid zone schedule entry
    #[error(transparent)]
    Shipping(#[from] ShippingError),

    /// Catalog construction error
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Parse a fixture date string (`"YYYY-MM-DD"`).
///
/// # Errors
///
/// Returns [`FixtureError::InvalidDate`] when the string is not a calendar
/// date in that format.
pub fn parse_date(raw: &str) -> Result<NaiveDate, FixtureError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_err| FixtureError::InvalidDate(raw.to_string()))
}

/// A fully loaded pricing context.
#[derive(Debug)]
pub struct Fixture {
    /// Product catalog.
    pub catalog: Catalog<'static>,

    /// Special offers in published priority order.
    pub offers: Vec<SpecialOffer<'static>>,

    /// Promo codes.
    pub promos: Vec<PromoCode<'static>>,

    /// Shipping zones.
    pub zones: Vec<ShippingZone<'static>>,

    /// Store identity, when a store fixture is supplied.
    pub store: Option<StoreConfig>,
}

impl Fixture {
    /// Load a pricing context from YAML strings. Only the catalog is
    /// mandatory.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if any document fails to parse or convert.
    pub fn from_strs(
        catalog_yaml: &str,
        offers_yaml: Option<&str>,
        promos_yaml: Option<&str>,
        zones_yaml: Option<&str>,
    ) -> Result<Self, FixtureError> {
        let catalog_fixture: CatalogFixture = serde_norway::from_str(catalog_yaml)?;
        let catalog = catalog_fixture.into_catalog()?;

        let offers = match offers_yaml {
            Some(yaml) => {
                let fixture: OffersFixture = serde_norway::from_str(yaml)?;
                fixture.into_offers()?
            }
            None => Vec::new(),
        };

        let promos = match promos_yaml {
            Some(yaml) => {
                let fixture: PromosFixture = serde_norway::from_str(yaml)?;
                fixture.into_promos()?
            }
            None => Vec::new(),
        };

        let zones = match zones_yaml {
            Some(yaml) => {
                let fixture: ZonesFixture = serde_norway::from_str(yaml)?;
                fixture.into_zones()?
            }
            None => Vec::new(),
        };

        Ok(Self {
            catalog,
            offers,
            promos,
            zones,
            store: None,
        })
    }

    /// Load a pricing context from YAML files. Only the catalog is
    /// mandatory.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if a file cannot be read or a document
    /// fails to parse or convert.
    pub fn from_paths(
        catalog_path: &Path,
        offers_path: Option<&Path>,
        promos_path: Option<&Path>,
        zones_path: Option<&Path>,
    ) -> Result<Self, FixtureError> {
        let catalog_yaml = fs::read_to_string(catalog_path)?;
        let offers_yaml = offers_path.map(fs::read_to_string).transpose()?;
        let promos_yaml = promos_path.map(fs::read_to_string).transpose()?;
        let zones_yaml = zones_path.map(fs::read_to_string).transpose()?;

        Self::from_strs(
            &catalog_yaml,
            offers_yaml.as_deref(),
            promos_yaml.as_deref(),
            zones_yaml.as_deref(),
        )
    }

    /// Attach a store config loaded from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or parsed.
    pub fn with_store_from_path(mut self, path: &Path) -> Result<Self, FixtureError> {
        let yaml = fs::read_to_string(path)?;
        self.store = Some(serde_norway::from_str(&yaml)?);

        Ok(self)
    }

    /// Find a loaded promo code by its customer-entered code.
    pub fn promo(&self, code: &str) -> Option<&PromoCode<'static>> {
        self.promos.iter().find(|promo| promo.code == code)
    }

    /// All loaded products, for display purposes.
    pub fn products(&self) -> impl Iterator<Item = &Product<'static>> {
        self.catalog.iter()
    }
}
