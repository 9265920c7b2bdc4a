pub mod payment;
pub mod requests;
pub mod response;
