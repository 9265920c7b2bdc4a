use crate::{
    abstract_trait::order::OrderCommandRepositoryTrait,
    domain::{payment::PaidTransition, requests::order::CreateOrderRecordRequest},
    model::order::{Order as OrderModel, OrderItem as OrderItemModel},
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info, warn};

pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<(OrderModel, Vec<OrderItemModel>), RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let order = sqlx::query_as::<_, OrderModel>(
            r#"
            INSERT INTO orders (user_id, amount, address_id, payment_type, is_paid,
                                created_at, updated_at)
            VALUES ($1, $2, $3, $4, FALSE, current_timestamp, current_timestamp)
            RETURNING order_id, user_id, amount, address_id, payment_type, is_paid,
                      created_at, updated_at
            "#,
        )
        .bind(req.user_id)
        .bind(req.amount)
        .bind(req.address_id)
        .bind(req.payment_type.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            error!("❌ Failed to create order for user {}: {err:?}", req.user_id);
            RepositoryError::from(err)
        })?;

        let mut items = Vec::with_capacity(req.items.len());
        for item in &req.items {
            let row = sqlx::query_as::<_, OrderItemModel>(
                r#"
                INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                VALUES ($1, $2, $3, $4)
                RETURNING order_id, product_id, quantity, unit_price
                "#,
            )
            .bind(order.order_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to add product {} to order {}: {err:?}",
                    item.product_id, order.order_id
                );
                RepositoryError::from(err)
            })?;

            items.push(row);
        }

        tx.commit().await.map_err(|err| {
            error!("❌ Failed to commit order {}: {err:?}", order.order_id);
            RepositoryError::from(err)
        })?;

        info!(
            "✅ Created order {} for user {} ({} lines, amount {})",
            order.order_id,
            order.user_id,
            items.len(),
            order.amount
        );
        Ok((order, items))
    }

    async fn mark_paid(&self, order_id: i32) -> Result<PaidTransition, RepositoryError> {
        let mut tx = self.db.begin().await.map_err(RepositoryError::from)?;

        let is_paid: Option<bool> = sqlx::query_scalar(
            r#"
            SELECT is_paid FROM orders
            WHERE order_id = $1
            FOR UPDATE
            "#,
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|err| {
            error!("❌ Failed to lock order {order_id}: {err:?}");
            RepositoryError::from(err)
        })?;

        let transition = match is_paid {
            None => {
                warn!("⚠️ Order {order_id} not found while marking as paid");
                PaidTransition::Missing
            }
            Some(true) => {
                info!("🔁 Order {order_id} was already paid");
                PaidTransition::AlreadyPaid
            }
            Some(false) => {
                sqlx::query(
                    r#"
                    UPDATE orders
                    SET is_paid = TRUE, updated_at = current_timestamp
                    WHERE order_id = $1
                    "#,
                )
                .bind(order_id)
                .execute(&mut *tx)
                .await
                .map_err(|err| {
                    error!("❌ Failed to mark order {order_id} as paid: {err:?}");
                    RepositoryError::from(err)
                })?;

                info!("💰 Order {order_id} marked as paid");
                PaidTransition::Marked
            }
        };

        tx.commit().await.map_err(|err| {
            error!("❌ Failed to commit payment of order {order_id}: {err:?}");
            RepositoryError::from(err)
        })?;

        Ok(transition)
    }

    async fn delete_unpaid(&self, order_id: i32) -> Result<bool, RepositoryError> {
        info!("🗑️ Deleting unpaid order: {order_id}");

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query(
            r#"
            DELETE FROM orders
            WHERE order_id = $1 AND is_paid = FALSE
            "#,
        )
        .bind(order_id)
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to delete order {order_id}: {err:?}");
            RepositoryError::from(err)
        })?;

        Ok(result.rows_affected() > 0)
    }
}
