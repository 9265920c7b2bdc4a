use crate::{abstract_trait::cart::CartRepositoryTrait, model::user::UserCart};
use async_trait::async_trait;
use shared::{config::ConnectionPool, domain::Cart, errors::RepositoryError};
use sqlx::types::Json;
use tracing::{error, info};

pub struct CartRepository {
    db: ConnectionPool,
}

impl CartRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartRepositoryTrait for CartRepository {
    async fn get_cart(&self, user_id: i32) -> Result<Cart, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let row = sqlx::query_as::<_, UserCart>(
            r#"
            SELECT user_id, cart_items
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to fetch cart for user {user_id}: {err:?}");
            RepositoryError::from(err)
        })?;

        match row {
            Some(UserCart {
                cart_items: Json(cart),
                ..
            }) => Ok(cart),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn save_cart(&self, user_id: i32, cart: &Cart) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET cart_items = $2,
                updated_at = current_timestamp
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(Json(cart))
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to save cart for user {user_id}: {err:?}");
            RepositoryError::from(err)
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("🛒 Saved cart for user {user_id} ({} lines)", cart.len());
        Ok(())
    }
}
