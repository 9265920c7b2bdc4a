//! The cart aggregator.
//!
//! A [`Cart`] is a snapshot: every operation reads the current snapshot and
//! returns the next one, leaving the receiver untouched. Whoever owns the
//! session decides what to do with the result.

use crate::domain::pricing::Catalog;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Quantity for product {product_id} must be at least 1, got {quantity}")]
    InvalidQuantity { product_id: i32, quantity: i32 },

    #[error("Product {0} appears more than once in the cart")]
    DuplicateProduct(i32),

    #[error("Cart line is missing a product id")]
    MissingProduct,
}

/// One product and the requested quantity.
///
/// Absent fields deserialize as `0`, which marks the line as malformed
/// rather than failing the whole snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(default)]
    pub product_id: i32,
    #[serde(default)]
    pub quantity: i32,
}

impl CartLine {
    pub fn new(product_id: i32, quantity: i32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.product_id > 0 && self.quantity > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from lines received at a trust boundary, rejecting
    /// anything that could not have been produced by the cart operations.
    pub fn try_from_lines(lines: Vec<CartLine>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(lines.len());

        for line in &lines {
            if line.product_id <= 0 {
                return Err(CartError::MissingProduct);
            }
            if line.quantity < 1 {
                return Err(CartError::InvalidQuantity {
                    product_id: line.product_id,
                    quantity: line.quantity,
                });
            }
            if !seen.insert(line.product_id) {
                return Err(CartError::DuplicateProduct(line.product_id));
            }
        }

        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn quantity_of(&self, product_id: i32) -> Option<i32> {
        self.lines
            .iter()
            .find(|line| line.product_id == product_id)
            .map(|line| line.quantity)
    }

    /// Adds one unit of `product_id`, creating the line if needed.
    pub fn add_line(&self, product_id: i32) -> Cart {
        let mut next = self.clone();

        match next
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            Some(line) => line.quantity += 1,
            None => next.lines.push(CartLine::new(product_id, 1)),
        }

        next
    }

    /// Replaces the quantity of an existing line. Unknown products are left alone.
    pub fn set_quantity(&self, product_id: i32, quantity: i32) -> Result<Cart, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity {
                product_id,
                quantity,
            });
        }

        let mut next = self.clone();
        if let Some(line) = next
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.quantity = quantity;
        }

        Ok(next)
    }

    /// Takes one unit away; a line that reaches zero is dropped.
    pub fn remove_one(&self, product_id: i32) -> Cart {
        let lines = self
            .lines
            .iter()
            .filter_map(|line| {
                if line.product_id != product_id {
                    return Some(*line);
                }
                let quantity = line.quantity - 1;
                (quantity > 0).then_some(CartLine::new(line.product_id, quantity))
            })
            .collect();

        Cart { lines }
    }

    pub fn total_item_count(&self) -> i64 {
        self.lines
            .iter()
            .filter(|line| line.is_well_formed())
            .map(|line| i64::from(line.quantity))
            .sum()
    }

    pub fn total_amount<C: Catalog + ?Sized>(&self, catalog: &C) -> i64 {
        self.lines
            .iter()
            .filter(|line| line.is_well_formed())
            .filter_map(|line| {
                catalog
                    .lookup(line.product_id)
                    .map(|price| price.effective() * i64::from(line.quantity))
            })
            .sum()
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
