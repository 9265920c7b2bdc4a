pub mod address;
pub mod order;
pub mod product;
pub mod user;
