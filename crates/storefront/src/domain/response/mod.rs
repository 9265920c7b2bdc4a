pub mod address;
pub mod api;
pub mod checkout;
pub mod order;
pub mod product;
