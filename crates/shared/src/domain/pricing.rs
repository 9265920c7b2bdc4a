//! Authoritative pricing rules shared by the cart and the order assembler.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, hash::BuildHasher};

/// Sales tax added on top of the item subtotal, in percent.
pub const TAX_PERCENT: i64 = 2;

/// The catalog prices of a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPrice {
    pub price: i64,
    pub offer_price: Option<i64>,
}

impl UnitPrice {
    pub fn new(price: i64, offer_price: Option<i64>) -> Self {
        Self { price, offer_price }
    }

    /// The price a shopper actually pays: the offer price when one is set.
    pub fn effective(&self) -> i64 {
        self.offer_price.unwrap_or(self.price)
    }
}

/// Read-only price lookup by product id.
pub trait Catalog {
    fn lookup(&self, product_id: i32) -> Option<UnitPrice>;
}

impl<S: BuildHasher> Catalog for HashMap<i32, UnitPrice, S> {
    fn lookup(&self, product_id: i32) -> Option<UnitPrice> {
        self.get(&product_id).copied()
    }
}

/// Order total for a subtotal: tax is added once on the sum and the result
/// is floored to a whole unit.
pub fn order_amount(subtotal: i64) -> i64 {
    (subtotal * (100 + TAX_PERCENT)).div_euclid(100)
}

/// The tax part of `order_amount`, so that `subtotal + tax == order_amount`.
pub fn tax_amount(subtotal: i64) -> i64 {
    order_amount(subtotal) - subtotal
}

/// Whole currency units in minor units (cents) for the payment processor.
pub fn to_cents(units: i64) -> i64 {
    units * 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_price_prefers_offer() {
        assert_eq!(UnitPrice::new(100, Some(90)).effective(), 90);
        assert_eq!(UnitPrice::new(50, None).effective(), 50);
    }

    #[test]
    fn tax_is_floored_once_on_the_total() {
        // (90 * 2 + 50) * 1.02 = 234.6
        assert_eq!(order_amount(230), 234);
        assert_eq!(order_amount(0), 0);
        assert_eq!(order_amount(100), 102);
        assert_eq!(order_amount(49), 49);
    }

    #[test]
    fn tax_and_subtotal_add_up_to_the_order_amount() {
        for subtotal in [0, 1, 49, 50, 99, 100, 230, 12_345] {
            assert_eq!(subtotal + tax_amount(subtotal), order_amount(subtotal));
        }
        assert_eq!(tax_amount(230), 4);
        assert_eq!(tax_amount(49), 0);
        assert_eq!(to_cents(234), 23_400);
    }
}
