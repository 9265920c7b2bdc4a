use crate::{domain::CartError, errors::repository::RepositoryError};
use jsonwebtoken::errors::Error as JwtError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("User not authenticated")]
    Unauthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("Address is required")]
    MissingAddress,

    #[error("Cart items are required")]
    EmptyCart,

    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i32),

    #[error("Product not found: {0}")]
    ProductNotFound(i32),

    #[error("Payment processor error: {0}")]
    Payment(String),

    #[error("Webhook signature rejected: {0}")]
    WebhookSignature(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid Token")]
    InvalidTokenType,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CartError> for ServiceError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::InvalidQuantity { quantity, .. } => ServiceError::InvalidQuantity(quantity),
            other => ServiceError::Validation(vec![other.to_string()]),
        }
    }
}
