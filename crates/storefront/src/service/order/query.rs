use crate::{
    abstract_trait::{
        address::DynAddressRepository,
        order::{DynOrderQueryRepository, OrderQueryServiceTrait},
        product::DynProductRepository,
    },
    domain::response::{
        address::AddressResponse,
        api::ApiResponse,
        order::{OrderItemResponse, OrderResponse},
        product::ProductResponse,
    },
    model::order::Order as OrderModel,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::{RepositoryError, ServiceError},
    utils::{Method, ServiceObserver, TracingContext},
};
use std::collections::{BTreeSet, HashMap};

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    products: DynProductRepository,
    addresses: DynAddressRepository,
    observer: ServiceObserver,
}

pub struct OrderQueryServiceDeps {
    pub query: DynOrderQueryRepository,
    pub products: DynProductRepository,
    pub addresses: DynAddressRepository,
}

impl OrderQueryService {
    pub fn new(deps: OrderQueryServiceDeps, registry: &mut Registry) -> Self {
        let OrderQueryServiceDeps {
            query,
            products,
            addresses,
        } = deps;

        Self {
            query,
            products,
            addresses,
            observer: ServiceObserver::new("order-query-service", "OrderQueryService", registry),
        }
    }

    /// Resolves the product and address references of `orders`, keeping
    /// their order.
    async fn join(&self, orders: Vec<OrderModel>) -> Result<Vec<OrderResponse>, RepositoryError> {
        let order_ids: Vec<i32> = orders.iter().map(|o| o.order_id).collect();
        let items = self.query.find_items(&order_ids).await?;

        let product_ids: Vec<i32> = items
            .iter()
            .map(|item| item.product_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let address_ids: Vec<i32> = orders
            .iter()
            .map(|o| o.address_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let products: HashMap<i32, ProductResponse> = self
            .products
            .find_by_ids(&product_ids)
            .await?
            .into_iter()
            .map(|p| (p.product_id, ProductResponse::from(p)))
            .collect();
        let addresses: HashMap<i32, AddressResponse> = self
            .addresses
            .find_by_ids(&address_ids)
            .await?
            .into_iter()
            .map(|a| (a.address_id, AddressResponse::from(a)))
            .collect();

        let mut items_by_order: HashMap<i32, Vec<OrderItemResponse>> = HashMap::new();
        for item in items {
            let product = products.get(&item.product_id).cloned();
            items_by_order
                .entry(item.order_id)
                .or_default()
                .push(OrderItemResponse {
                    product,
                    ..OrderItemResponse::from(item)
                });
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = items_by_order.remove(&order.order_id).unwrap_or_default();
                let address = addresses.get(&order.address_id).cloned();
                OrderResponse {
                    address,
                    ..OrderResponse::from_parts(order, items)
                }
            })
            .collect())
    }

    fn finish_list(
        &self,
        tracing_ctx: &TracingContext,
        joined: Result<Vec<OrderResponse>, RepositoryError>,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        match joined {
            Ok(orders) => {
                self.observer.complete_tracing_success(
                    tracing_ctx,
                    Method::Get,
                    &format!("Listed {} orders", orders.len()),
                );
                Ok(ApiResponse::ok("Orders fetched", orders))
            }
            Err(err) => {
                self.observer.complete_tracing_error(
                    tracing_ctx,
                    Method::Get,
                    &format!("Failed to list orders: {err}"),
                );
                Err(ServiceError::Repo(err))
            }
        }
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn list_for_user(
        &self,
        user_id: i32,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        let tracing_ctx = self.observer.start_tracing(
            "list_orders_for_user",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "list_for_user"),
                KeyValue::new("user.id", user_id.to_string()),
            ],
        );

        let joined = match self.query.find_by_user(user_id).await {
            Ok(orders) => self.join(orders).await,
            Err(err) => Err(err),
        };

        self.finish_list(&tracing_ctx, joined)
    }

    async fn list_all(&self) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        let tracing_ctx = self.observer.start_tracing(
            "list_all_orders",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "list_all"),
            ],
        );

        let joined = match self.query.find_all().await {
            Ok(orders) => self.join(orders).await,
            Err(err) => Err(err),
        };

        self.finish_list(&tracing_ctx, joined)
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        let tracing_ctx = self.observer.start_tracing(
            "find_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "find_by_id"),
                KeyValue::new("order.id", id.to_string()),
            ],
        );

        let found = match self.query.find_by_id(id).await {
            Ok(Some(order)) => self.join(vec![order]).await,
            Ok(None) => Err(RepositoryError::NotFound),
            Err(err) => Err(err),
        };

        match found.map(|mut orders| orders.pop()) {
            Ok(Some(order)) => {
                self.observer
                    .complete_tracing_success(&tracing_ctx, Method::Get, "Order found");
                Ok(ApiResponse::ok("Order fetched", order))
            }
            Ok(None) | Err(RepositoryError::NotFound) => {
                self.observer.complete_tracing_error(
                    &tracing_ctx,
                    Method::Get,
                    &format!("Order {id} not found"),
                );
                Err(ServiceError::Repo(RepositoryError::NotFound))
            }
            Err(err) => {
                self.observer.complete_tracing_error(
                    &tracing_ctx,
                    Method::Get,
                    &format!("Failed to fetch order: {err}"),
                );
                Err(ServiceError::Repo(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            payment::PaymentType,
            requests::order::{CreateOrderItemRecordRequest, CreateOrderRecordRequest},
        },
        test_support::InMemoryStore,
    };
    use testresult::TestResult;

    fn service(store: &InMemoryStore) -> OrderQueryService {
        OrderQueryService::new(
            OrderQueryServiceDeps {
                query: store.order_queries(),
                products: store.products(),
                addresses: store.addresses(),
            },
            &mut Registry::default(),
        )
    }

    async fn seed_order(store: &InMemoryStore, user: i32, address: i32, product: i32) -> TestResult<i32> {
        let (order, _) = store
            .order_commands()
            .create_order(&CreateOrderRecordRequest {
                user_id: user,
                amount: 102,
                address_id: address,
                payment_type: PaymentType::CashOnDelivery,
                items: vec![CreateOrderItemRecordRequest {
                    product_id: product,
                    quantity: 1,
                    unit_price: 100,
                }],
            })
            .await?;
        Ok(order.order_id)
    }

    #[tokio::test]
    async fn lists_own_orders_newest_first_with_references_joined() -> TestResult {
        let store = InMemoryStore::new();
        let user = store.add_user();
        let other = store.add_user();
        let address = store.add_address(user);
        let other_address = store.add_address(other);
        let product = store.add_product("Lamp", 100, None);

        let first = seed_order(&store, user, address, product).await?;
        seed_order(&store, other, other_address, product).await?;
        let second = seed_order(&store, user, address, product).await?;
        let third = seed_order(&store, user, address, product).await?;

        let orders = service(&store).list_for_user(user).await?.data;

        let ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![third, second, first]);
        for window in orders.windows(2) {
            assert!(window[0].created_at > window[1].created_at);
        }
        assert!(orders.iter().all(|o| o.user_id == user));
        assert_eq!(orders[0].address.as_ref().map(|a| a.id), Some(address));
        assert_eq!(
            orders[0].items[0].product.as_ref().map(|p| p.name.as_str()),
            Some("Lamp")
        );
        Ok(())
    }

    #[tokio::test]
    async fn lists_everyones_orders_for_the_seller() -> TestResult {
        let store = InMemoryStore::new();
        let product = store.add_product("Lamp", 100, None);
        let mut expected = Vec::new();
        for _ in 0..3 {
            let user = store.add_user();
            let address = store.add_address(user);
            expected.push(seed_order(&store, user, address, product).await?);
        }
        expected.reverse();

        let orders = service(&store).list_all().await?.data;

        assert_eq!(orders.iter().map(|o| o.id).collect::<Vec<_>>(), expected);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let store = InMemoryStore::new();

        let result = service(&store).find_by_id(41).await;

        assert!(matches!(
            result,
            Err(ServiceError::Repo(RepositoryError::NotFound))
        ));
    }
}
