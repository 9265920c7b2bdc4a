use crate::{
    domain::{
        requests::address::{CreateAddressRecordRequest, CreateAddressRequest},
        response::{address::AddressResponse, api::ApiResponse},
    },
    model::address::Address as AddressModel,
};
use async_trait::async_trait;
use shared::errors::{RepositoryError, ServiceError};
use std::sync::Arc;

pub type DynAddressRepository = Arc<dyn AddressRepositoryTrait + Send + Sync>;
pub type DynAddressService = Arc<dyn AddressServiceTrait + Send + Sync>;

#[async_trait]
pub trait AddressRepositoryTrait {
    async fn create_address(
        &self,
        req: &CreateAddressRecordRequest,
    ) -> Result<AddressModel, RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<AddressModel>, RepositoryError>;
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<AddressModel>, RepositoryError>;
    async fn find_by_user(&self, user_id: i32) -> Result<Vec<AddressModel>, RepositoryError>;
}

#[async_trait]
pub trait AddressServiceTrait {
    async fn add_address(
        &self,
        user_id: i32,
        req: &CreateAddressRequest,
    ) -> Result<ApiResponse<AddressResponse>, ServiceError>;
    async fn list_for_user(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<Vec<AddressResponse>>, ServiceError>;
}
