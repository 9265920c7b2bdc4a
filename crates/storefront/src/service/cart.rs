use crate::{
    abstract_trait::cart::{CartServiceTrait, DynCartRepository},
    domain::{
        requests::cart::UpdateCartRequest,
        response::api::{ApiResponse, MessageResponse},
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    domain::{Cart, CartLine},
    errors::ServiceError,
    utils::{Method, ServiceObserver},
};
use tracing::info;

#[derive(Clone)]
pub struct CartService {
    repository: DynCartRepository,
    observer: ServiceObserver,
}

impl CartService {
    pub fn new(repository: DynCartRepository, registry: &mut Registry) -> Self {
        Self {
            repository,
            observer: ServiceObserver::new("cart-service", "CartService", registry),
        }
    }
}

#[async_trait]
impl CartServiceTrait for CartService {
    async fn get_cart(&self, user_id: i32) -> Result<ApiResponse<Vec<CartLine>>, ServiceError> {
        let tracing_ctx = self.observer.start_tracing(
            "get_cart",
            vec![
                KeyValue::new("component", "cart"),
                KeyValue::new("operation", "get"),
                KeyValue::new("user.id", user_id.to_string()),
            ],
        );

        match self.repository.get_cart(user_id).await {
            Ok(cart) => {
                self.observer
                    .complete_tracing_success(&tracing_ctx, Method::Get, "Cart fetched");
                Ok(ApiResponse::ok("Cart fetched", cart.into_lines()))
            }
            Err(err) => {
                self.observer.complete_tracing_error(
                    &tracing_ctx,
                    Method::Get,
                    &format!("Failed to fetch cart: {err}"),
                );
                Err(ServiceError::Repo(err))
            }
        }
    }

    async fn update_cart(
        &self,
        user_id: i32,
        req: &UpdateCartRequest,
    ) -> Result<MessageResponse, ServiceError> {
        info!("🛒 Syncing cart for user {user_id}");

        let tracing_ctx = self.observer.start_tracing(
            "update_cart",
            vec![
                KeyValue::new("component", "cart"),
                KeyValue::new("operation", "update"),
                KeyValue::new("user.id", user_id.to_string()),
                KeyValue::new("cart.lines", req.cart_items.len() as i64),
            ],
        );

        let cart = match Cart::try_from_lines(req.cart_items.clone()) {
            Ok(cart) => cart,
            Err(err) => {
                self.observer.complete_tracing_error(
                    &tracing_ctx,
                    Method::Post,
                    &format!("Rejected cart snapshot: {err}"),
                );
                return Err(err.into());
            }
        };

        if let Err(err) = self.repository.save_cart(user_id, &cart).await {
            self.observer.complete_tracing_error(
                &tracing_ctx,
                Method::Post,
                &format!("Failed to save cart: {err}"),
            );
            return Err(ServiceError::Repo(err));
        }

        self.observer
            .complete_tracing_success(&tracing_ctx, Method::Post, "Cart updated");

        Ok(MessageResponse::ok("Cart Updated"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryStore;
    use shared::errors::RepositoryError;
    use testresult::TestResult;

    fn service(store: &InMemoryStore) -> CartService {
        CartService::new(store.carts(), &mut Registry::default())
    }

    #[tokio::test]
    async fn stores_the_snapshot_wholesale() -> TestResult {
        let store = InMemoryStore::new();
        let user = store.add_user();
        let service = service(&store);

        service
            .update_cart(
                user,
                &UpdateCartRequest {
                    cart_items: vec![CartLine::new(1, 2), CartLine::new(2, 1)],
                },
            )
            .await?;
        service
            .update_cart(
                user,
                &UpdateCartRequest {
                    cart_items: vec![CartLine::new(3, 4)],
                },
            )
            .await?;

        let stored = service.get_cart(user).await?;
        assert_eq!(stored.data, vec![CartLine::new(3, 4)]);
        Ok(())
    }

    #[tokio::test]
    async fn rejects_non_positive_quantities_without_touching_storage() -> TestResult {
        let store = InMemoryStore::new();
        let user = store.add_user();
        store.set_cart(user, vec![CartLine::new(1, 1)]);
        let service = service(&store);

        let result = service
            .update_cart(
                user,
                &UpdateCartRequest {
                    cart_items: vec![CartLine::new(1, 0)],
                },
            )
            .await;

        assert!(matches!(result, Err(ServiceError::InvalidQuantity(0))));
        assert_eq!(store.cart_of(user), Some(vec![CartLine::new(1, 1)]));
        Ok(())
    }

    #[tokio::test]
    async fn rejects_duplicate_products() {
        let store = InMemoryStore::new();
        let user = store.add_user();

        let result = service(&store)
            .update_cart(
                user,
                &UpdateCartRequest {
                    cart_items: vec![CartLine::new(1, 1), CartLine::new(1, 3)],
                },
            )
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let store = InMemoryStore::new();

        let result = service(&store).get_cart(404).await;

        assert!(matches!(
            result,
            Err(ServiceError::Repo(RepositoryError::NotFound))
        ));
    }
}
