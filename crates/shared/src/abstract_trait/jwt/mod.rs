use crate::errors::ServiceError;
use std::{fmt, sync::Arc};

pub type DynJwtService = Arc<dyn JwtServiceTrait + Send + Sync>;

/// Which audience a token was issued for. Shoppers carry `Access` tokens,
/// the store operator carries `Seller` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Access,
    Seller,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Seller => "seller",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait JwtServiceTrait: Send + Sync + fmt::Debug {
    fn generate_token(&self, user_id: i32, token_type: TokenType) -> Result<String, ServiceError>;
    fn verify_token(&self, token: &str, expected_type: TokenType) -> Result<i32, ServiceError>;
}
