pub mod address;
pub mod cart;
pub mod order;
pub mod payment;
pub mod product;
