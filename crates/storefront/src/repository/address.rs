use crate::{
    abstract_trait::address::AddressRepositoryTrait,
    domain::requests::address::CreateAddressRecordRequest, model::address::Address as AddressModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

pub struct AddressRepository {
    db: ConnectionPool,
}

impl AddressRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AddressRepositoryTrait for AddressRepository {
    async fn create_address(
        &self,
        req: &CreateAddressRecordRequest,
    ) -> Result<AddressModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let address = sqlx::query_as::<_, AddressModel>(
            r#"
            INSERT INTO addresses (user_id, first_name, last_name, email, street, city,
                                   state, country, zip_code, phone, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, current_timestamp)
            RETURNING address_id, user_id, first_name, last_name, email, street, city,
                      state, country, zip_code, phone, created_at
            "#,
        )
        .bind(req.user_id)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.email)
        .bind(&req.street)
        .bind(&req.city)
        .bind(&req.state)
        .bind(&req.country)
        .bind(&req.zip_code)
        .bind(&req.phone)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to create address for user {}: {err:?}", req.user_id);
            RepositoryError::from(err)
        })?;

        info!(
            "🏠 Created address {} for user {}",
            address.address_id, address.user_id
        );
        Ok(address)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<AddressModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, AddressModel>(
            r#"
            SELECT address_id, user_id, first_name, last_name, email, street, city,
                   state, country, zip_code, phone, created_at
            FROM addresses
            WHERE address_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to fetch address {id}: {err:?}");
            RepositoryError::from(err)
        })
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<AddressModel>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, AddressModel>(
            r#"
            SELECT address_id, user_id, first_name, last_name, email, street, city,
                   state, country, zip_code, phone, created_at
            FROM addresses
            WHERE address_id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to fetch addresses {ids:?}: {err:?}");
            RepositoryError::from(err)
        })
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<AddressModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, AddressModel>(
            r#"
            SELECT address_id, user_id, first_name, last_name, email, street, city,
                   state, country, zip_code, phone, created_at
            FROM addresses
            WHERE user_id = $1
            ORDER BY created_at ASC, address_id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to list addresses for user {user_id}: {err:?}");
            RepositoryError::from(err)
        })
    }
}
