//! Inventory
//!
//! Stock reservation for checkout. The reservation API is a conditional
//! decrement: the availability check and the decrement happen inside one
//! call against one entry, so a failed reservation never changes stock and
//! there is no separate read-then-write window to interleave with.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::products::ProductId;

/// Errors raised by stock operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// The ledger tracks no such product.
    #[error("no stock record for product {0}")]
    UnknownProduct(ProductId),

    /// The requested quantity exceeds what is on hand.
    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock {
        /// Units currently on hand.
        available: u32,

        /// Units the reservation asked for.
        requested: u32,
    },
}

/// Per-product stock levels.
#[derive(Debug, Default)]
pub struct StockLedger {
    levels: FxHashMap<ProductId, u32>,
}

impl StockLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stock level for a product, creating the record if needed.
    pub fn set_level(&mut self, product: ProductId, level: u32) {
        self.levels.insert(product, level);
    }

    /// Current stock level for a product.
    pub fn level(&self, product: &ProductId) -> Option<u32> {
        self.levels.get(product).copied()
    }

    /// Reserve `quantity` units of a product.
    ///
    /// The availability check and the decrement are one operation: on
    /// failure the ledger is untouched. Returns the remaining level on
    /// success.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::UnknownProduct`] for untracked products and
    /// [`InventoryError::InsufficientStock`] when fewer units are on hand
    /// than requested.
    pub fn reserve(&mut self, product: &ProductId, quantity: u32) -> Result<u32, InventoryError> {
        let level = self
            .levels
            .get_mut(product)
            .ok_or_else(|| InventoryError::UnknownProduct(product.clone()))?;

        let remaining = level
            .checked_sub(quantity)
            .ok_or(InventoryError::InsufficientStock {
                available: *level,
                requested: quantity,
            })?;

        *level = remaining;

        Ok(remaining)
    }

    /// Return previously reserved units to stock, saturating at `u32::MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::UnknownProduct`] for untracked products.
    pub fn release(&mut self, product: &ProductId, quantity: u32) -> Result<u32, InventoryError> {
        let level = self
            .levels
            .get_mut(product)
            .ok_or_else(|| InventoryError::UnknownProduct(product.clone()))?;

        *level = level.saturating_add(quantity);

        Ok(*level)
    }
}
