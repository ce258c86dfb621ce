//! Products
//!
//! The catalog is a read-only input to every pricing computation: products
//! are loaded fresh per request by the caller and never mutated here.

use std::fmt;

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::discounts::RegularDiscount;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Document-store product identifier, compared as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Merchandising category a product is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Category(String);

impl Category {
    /// Create a category from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The raw category name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Document-store identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Merchandising category.
    pub category: Category,

    /// Undiscounted unit price.
    pub regular_price: Money<'a, Currency>,

    /// Standing discount, if any. A zero discount value in source data maps
    /// to `None`.
    pub discount: Option<RegularDiscount<'a>>,
}

/// Errors related to catalog construction.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A product's currency differs from the catalog currency.
    #[error("product {id} is priced in {actual}, but the catalog uses {expected}")]
    CurrencyMismatch {
        /// Product that failed validation.
        id: ProductId,

        /// Catalog currency code.
        expected: &'static str,

        /// Product currency code.
        actual: &'static str,
    },
}

/// Single-currency product catalog with id-indexed lookup.
#[derive(Debug)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    index: FxHashMap<ProductId, ProductKey>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog priced in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            index: FxHashMap::default(),
            currency,
        }
    }

    /// Insert a product, replacing any earlier product with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::CurrencyMismatch`] if the product is priced in
    /// a different currency than the catalog.
    pub fn insert(&mut self, product: Product<'a>) -> Result<ProductKey, CatalogError> {
        if product.regular_price.currency() != self.currency {
            return Err(CatalogError::CurrencyMismatch {
                id: product.id.clone(),
                expected: self.currency.iso_alpha_code,
                actual: product.regular_price.currency().iso_alpha_code,
            });
        }

        let id = product.id.clone();
        let key = self.products.insert(product);

        if let Some(stale) = self.index.insert(id, key) {
            self.products.remove(stale);
        }

        Ok(key)
    }

    /// Look a product up by its document-store id (string comparison).
    pub fn lookup(&self, id: &ProductId) -> Option<&Product<'a>> {
        self.index.get(id).and_then(|key| self.products.get(*key))
    }

    /// Fetch a product by its slotmap key.
    pub fn get(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Currency every product in this catalog is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Iterate over all products.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a>> {
        self.products.values()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{BDT, USD};
    use testresult::TestResult;

    use super::*;

    fn kameez<'a>() -> Product<'a> {
        Product {
            id: ProductId::from("fc-1001"),
            name: "Jamdani Kameez".to_string(),
            category: Category::from("dresses"),
            regular_price: Money::from_minor(240_000, BDT),
            discount: None,
        }
    }

    #[test]
    fn lookup_matches_by_id_string() -> TestResult {
        let mut catalog = Catalog::new(BDT);
        catalog.insert(kameez())?;

        let found = catalog.lookup(&ProductId::from("fc-1001"));

        assert!(found.is_some(), "inserted product should be found");
        assert!(catalog.lookup(&ProductId::from("fc-9999")).is_none());

        Ok(())
    }

    #[test]
    fn insert_replaces_earlier_product_with_same_id() -> TestResult {
        let mut catalog = Catalog::new(BDT);
        catalog.insert(kameez())?;

        let mut updated = kameez();
        updated.regular_price = Money::from_minor(199_000, BDT);
        catalog.insert(updated)?;

        assert_eq!(catalog.len(), 1);

        let found = catalog
            .lookup(&ProductId::from("fc-1001"))
            .map(|product| product.regular_price.to_minor_units());

        assert_eq!(found, Some(199_000));

        Ok(())
    }

    #[test]
    fn insert_rejects_foreign_currency() {
        let mut catalog = Catalog::new(BDT);

        let mut usd_product = kameez();
        usd_product.regular_price = Money::from_minor(2_400, USD);

        let result = catalog.insert(usd_product);

        assert!(matches!(
            result,
            Err(CatalogError::CurrencyMismatch { expected, actual, .. })
                if expected == BDT.iso_alpha_code && actual == USD.iso_alpha_code
        ));
    }
}
