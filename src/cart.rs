//! Cart
//!
//! A cart is a list of product references with selected quantities. It holds
//! no prices of its own; every monetary figure is derived against the catalog
//! at quotation time.

use thiserror::Error;

use crate::products::ProductId;

/// Errors related to cart construction.
#[derive(Debug, Error)]
pub enum CartError {
    /// A cart line carried a zero quantity.
    #[error("cart line for product {product} has zero quantity")]
    ZeroQuantity {
        /// Product on the rejected line.
        product: ProductId,
    },
}

/// A single cart line: a product reference and a positive quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    product: ProductId,
    quantity: u32,
}

impl CartLine {
    /// Create a cart line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] if `quantity` is zero.
    pub fn new(product: ProductId, quantity: u32) -> Result<Self, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity { product });
        }

        Ok(Self { product, quantity })
    }

    /// The referenced product id.
    pub fn product(&self) -> &ProductId {
        &self.product
    }

    /// Selected quantity (always positive).
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Cart
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart from existing lines.
    pub fn with_lines(lines: impl Into<Vec<CartLine>>) -> Self {
        Self {
            lines: lines.into(),
        }
    }

    /// Append a line to the cart.
    pub fn push(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    /// The cart lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of selected units across all lines; zero for an empty
    /// cart.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }
}
