mod cart;
mod pricing;

pub use self::cart::{Cart, CartError, CartLine};
pub use self::pricing::{Catalog, TAX_PERCENT, UnitPrice, order_amount, tax_amount, to_cents};
