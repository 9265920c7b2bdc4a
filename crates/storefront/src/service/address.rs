use crate::{
    abstract_trait::address::{AddressServiceTrait, DynAddressRepository},
    domain::{
        requests::address::{CreateAddressRecordRequest, CreateAddressRequest},
        response::{address::AddressResponse, api::ApiResponse},
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, ServiceObserver},
};
use tracing::info;

#[derive(Clone)]
pub struct AddressService {
    repository: DynAddressRepository,
    observer: ServiceObserver,
}

impl AddressService {
    pub fn new(repository: DynAddressRepository, registry: &mut Registry) -> Self {
        Self {
            repository,
            observer: ServiceObserver::new("address-service", "AddressService", registry),
        }
    }
}

#[async_trait]
impl AddressServiceTrait for AddressService {
    async fn add_address(
        &self,
        user_id: i32,
        req: &CreateAddressRequest,
    ) -> Result<ApiResponse<AddressResponse>, ServiceError> {
        info!("🏠 Adding address for user {user_id}");

        let tracing_ctx = self.observer.start_tracing(
            "add_address",
            vec![
                KeyValue::new("component", "address"),
                KeyValue::new("operation", "create"),
                KeyValue::new("user.id", user_id.to_string()),
            ],
        );

        let record = CreateAddressRecordRequest::new(user_id, req);

        match self.repository.create_address(&record).await {
            Ok(address) => {
                self.observer
                    .complete_tracing_success(&tracing_ctx, Method::Post, "Address added");
                Ok(ApiResponse::ok("Address added successfully", address.into()))
            }
            Err(err) => {
                self.observer.complete_tracing_error(
                    &tracing_ctx,
                    Method::Post,
                    &format!("Failed to add address: {err}"),
                );
                Err(ServiceError::Repo(err))
            }
        }
    }

    async fn list_for_user(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<Vec<AddressResponse>>, ServiceError> {
        let tracing_ctx = self.observer.start_tracing(
            "list_addresses",
            vec![
                KeyValue::new("component", "address"),
                KeyValue::new("operation", "list"),
                KeyValue::new("user.id", user_id.to_string()),
            ],
        );

        match self.repository.find_by_user(user_id).await {
            Ok(addresses) => {
                self.observer
                    .complete_tracing_success(&tracing_ctx, Method::Get, "Addresses listed");
                Ok(ApiResponse::ok(
                    "Addresses fetched",
                    addresses.into_iter().map(AddressResponse::from).collect(),
                ))
            }
            Err(err) => {
                self.observer.complete_tracing_error(
                    &tracing_ctx,
                    Method::Get,
                    &format!("Failed to list addresses: {err}"),
                );
                Err(ServiceError::Repo(err))
            }
        }
    }
}
