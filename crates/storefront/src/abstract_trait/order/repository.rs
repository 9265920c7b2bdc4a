use crate::{
    domain::{payment::PaidTransition, requests::order::CreateOrderRecordRequest},
    model::order::{Order as OrderModel, OrderItem as OrderItemModel},
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;
pub type DynOrderQueryRepository = Arc<dyn OrderQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Inserts the order and all of its lines atomically.
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<(OrderModel, Vec<OrderItemModel>), RepositoryError>;

    /// Flips `is_paid` from false to true. Only the first call reports `Marked`.
    async fn mark_paid(&self, order_id: i32) -> Result<PaidTransition, RepositoryError>;

    /// Deletes the order if it is still unpaid; returns whether a row went away.
    async fn delete_unpaid(&self, order_id: i32) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait OrderQueryRepositoryTrait {
    /// Newest first.
    async fn find_all(&self) -> Result<Vec<OrderModel>, RepositoryError>;
    /// Newest first.
    async fn find_by_user(&self, user_id: i32) -> Result<Vec<OrderModel>, RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<OrderModel>, RepositoryError>;
    async fn find_items(&self, order_ids: &[i32]) -> Result<Vec<OrderItemModel>, RepositoryError>;
}
