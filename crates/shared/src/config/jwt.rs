use crate::{
    abstract_trait::{JwtServiceTrait, TokenType},
    errors::ServiceError,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub exp: usize,
    pub iat: usize,
    pub token_type: String,
}

impl Claims {
    pub fn new(user_id: i32, exp: usize, iat: usize, token_type: String) -> Self {
        Claims {
            user_id,
            exp,
            iat,
            token_type,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub jwt_secret: String,
}

impl JwtConfig {
    pub fn new(jwt_secret: &str) -> Self {
        JwtConfig {
            jwt_secret: jwt_secret.to_string(),
        }
    }
}

impl JwtServiceTrait for JwtConfig {
    fn generate_token(&self, user_id: i32, token_type: TokenType) -> Result<String, ServiceError> {
        let now = Utc::now();
        let iat = now.timestamp() as usize;
        let exp = (now + Duration::days(7)).timestamp() as usize;

        let claims = Claims::new(user_id, exp, iat, token_type.to_string());

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(ServiceError::Jwt)
    }

    fn verify_token(&self, token: &str, expected_type: TokenType) -> Result<i32, ServiceError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_ref());
        let token_data = decode::<Claims>(token, &decoding_key, &Validation::default()).map_err(
            |err| match err.kind() {
                ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
                _ => ServiceError::Jwt(err),
            },
        )?;

        if token_data.claims.token_type != expected_type.as_str() {
            return Err(ServiceError::InvalidTokenType);
        }

        Ok(token_data.claims.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testresult::TestResult;

    #[test]
    fn issued_token_round_trips_to_the_same_user() -> TestResult {
        let jwt = JwtConfig::new("storefront-secret");

        let token = jwt.generate_token(42, TokenType::Access)?;

        assert_eq!(jwt.verify_token(&token, TokenType::Access)?, 42);
        Ok(())
    }

    #[test]
    fn shopper_token_is_rejected_where_seller_token_is_required() -> TestResult {
        let jwt = JwtConfig::new("storefront-secret");
        let token = jwt.generate_token(7, TokenType::Access)?;

        let result = jwt.verify_token(&token, TokenType::Seller);

        assert!(matches!(result, Err(ServiceError::InvalidTokenType)));
        Ok(())
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() -> TestResult {
        let issuer = JwtConfig::new("one-secret");
        let verifier = JwtConfig::new("another-secret");
        let token = issuer.generate_token(7, TokenType::Access)?;

        assert!(matches!(
            verifier.verify_token(&token, TokenType::Access),
            Err(ServiceError::Jwt(_))
        ));
        Ok(())
    }
}
