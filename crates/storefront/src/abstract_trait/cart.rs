use crate::domain::{
    requests::cart::UpdateCartRequest,
    response::api::{ApiResponse, MessageResponse},
};
use async_trait::async_trait;
use shared::{
    domain::{Cart, CartLine},
    errors::{RepositoryError, ServiceError},
};
use std::sync::Arc;

pub type DynCartRepository = Arc<dyn CartRepositoryTrait + Send + Sync>;
pub type DynCartService = Arc<dyn CartServiceTrait + Send + Sync>;

/// The user cart store: one snapshot per user, overwritten wholesale.
#[async_trait]
pub trait CartRepositoryTrait {
    async fn get_cart(&self, user_id: i32) -> Result<Cart, RepositoryError>;
    async fn save_cart(&self, user_id: i32, cart: &Cart) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait CartServiceTrait {
    async fn get_cart(&self, user_id: i32) -> Result<ApiResponse<Vec<CartLine>>, ServiceError>;
    async fn update_cart(
        &self,
        user_id: i32,
        req: &UpdateCartRequest,
    ) -> Result<MessageResponse, ServiceError>;
}
