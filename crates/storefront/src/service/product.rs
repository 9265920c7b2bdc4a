use crate::{
    abstract_trait::product::{DynProductRepository, ProductServiceTrait},
    domain::response::{api::ApiResponse, product::ProductResponse},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::{RepositoryError, ServiceError},
    utils::{Method, ServiceObserver},
};

#[derive(Clone)]
pub struct ProductService {
    repository: DynProductRepository,
    observer: ServiceObserver,
}

impl ProductService {
    pub fn new(repository: DynProductRepository, registry: &mut Registry) -> Self {
        Self {
            repository,
            observer: ServiceObserver::new("product-service", "ProductService", registry),
        }
    }
}

#[async_trait]
impl ProductServiceTrait for ProductService {
    async fn find_all(&self) -> Result<ApiResponse<Vec<ProductResponse>>, ServiceError> {
        let tracing_ctx = self.observer.start_tracing(
            "list_products",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "list"),
            ],
        );

        match self.repository.find_all().await {
            Ok(products) => {
                self.observer
                    .complete_tracing_success(&tracing_ctx, Method::Get, "Products listed");
                Ok(ApiResponse::ok(
                    "Products fetched",
                    products.into_iter().map(ProductResponse::from).collect(),
                ))
            }
            Err(err) => {
                self.observer.complete_tracing_error(
                    &tracing_ctx,
                    Method::Get,
                    &format!("Failed to list products: {err}"),
                );
                Err(ServiceError::Repo(err))
            }
        }
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<ProductResponse>, ServiceError> {
        let tracing_ctx = self.observer.start_tracing(
            "find_product",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("operation", "find_by_id"),
                KeyValue::new("product.id", id.to_string()),
            ],
        );

        match self.repository.find_by_id(id).await {
            Ok(Some(product)) => {
                self.observer
                    .complete_tracing_success(&tracing_ctx, Method::Get, "Product found");
                Ok(ApiResponse::ok("Product fetched", product.into()))
            }
            Ok(None) => {
                self.observer.complete_tracing_error(
                    &tracing_ctx,
                    Method::Get,
                    &format!("Product {id} not found"),
                );
                Err(ServiceError::Repo(RepositoryError::NotFound))
            }
            Err(err) => {
                self.observer.complete_tracing_error(
                    &tracing_ctx,
                    Method::Get,
                    &format!("Failed to fetch product: {err}"),
                );
                Err(ServiceError::Repo(err))
            }
        }
    }
}
