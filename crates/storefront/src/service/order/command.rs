use crate::{
    abstract_trait::{
        address::DynAddressRepository,
        order::{DynOrderCommandRepository, OrderCommandServiceTrait},
        payment::DynPaymentGateway,
        product::DynProductRepository,
    },
    domain::{
        payment::{
            CheckoutLineItem, CheckoutSession, CheckoutSessionRequest, PaymentMetadata,
            PaymentMethod, PlacedOrder,
        },
        requests::order::{
            CreateOrderItemRecordRequest, CreateOrderRecordRequest, PlaceOrderRequest,
        },
        response::{
            address::AddressResponse,
            order::{OrderItemResponse, OrderResponse},
            product::ProductResponse,
        },
    },
    model::{address::Address as AddressModel, product::Product as ProductModel},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    domain::{Cart, TAX_PERCENT, UnitPrice, order_amount, tax_amount, to_cents},
    errors::ServiceError,
    utils::{Method, ServiceObserver, TracingContext},
};
use std::collections::HashMap;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct OrderCommandService {
    products: DynProductRepository,
    addresses: DynAddressRepository,
    command: DynOrderCommandRepository,
    gateway: DynPaymentGateway,
    observer: ServiceObserver,
}

pub struct OrderCommandServiceDeps {
    pub products: DynProductRepository,
    pub addresses: DynAddressRepository,
    pub command: DynOrderCommandRepository,
    pub gateway: DynPaymentGateway,
}

/// Everything `place_order` has checked and priced before writing.
struct PricedCheckout {
    address: AddressModel,
    lines: Vec<(ProductModel, i32)>,
    amount: i64,
}

impl OrderCommandService {
    pub fn new(deps: OrderCommandServiceDeps, registry: &mut Registry) -> Self {
        let OrderCommandServiceDeps {
            products,
            addresses,
            command,
            gateway,
        } = deps;

        Self {
            products,
            addresses,
            command,
            gateway,
            observer: ServiceObserver::new(
                "order-command-service",
                "OrderCommandService",
                registry,
            ),
        }
    }

    fn fail<T>(&self, tracing_ctx: &TracingContext, err: ServiceError) -> Result<T, ServiceError> {
        self.observer
            .complete_tracing_error(tracing_ctx, Method::Post, &err.to_string());
        Err(err)
    }

    /// Runs every validation step and reads authoritative prices. Nothing is
    /// written until this succeeds.
    async fn price_checkout(
        &self,
        user_id: i32,
        req: &PlaceOrderRequest,
    ) -> Result<PricedCheckout, ServiceError> {
        let address_id = req.address_id.ok_or(ServiceError::MissingAddress)?;

        let address = match self.addresses.find_by_id(address_id).await? {
            Some(address) if address.user_id == user_id => address,
            Some(_) => {
                warn!("⚠️ Address {address_id} does not belong to user {user_id}");
                return Err(ServiceError::MissingAddress);
            }
            None => return Err(ServiceError::MissingAddress),
        };

        if req.items.is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        let cart = Cart::try_from_lines(req.items.clone())?;

        let ids: Vec<i32> = cart.lines().iter().map(|line| line.product_id).collect();
        let mut found: HashMap<i32, ProductModel> = self
            .products
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|product| (product.product_id, product))
            .collect();

        let mut lines = Vec::with_capacity(cart.len());
        for line in cart.lines() {
            let product = found
                .remove(&line.product_id)
                .ok_or(ServiceError::ProductNotFound(line.product_id))?;
            lines.push((product, line.quantity));
        }

        let catalog: HashMap<i32, UnitPrice> = lines
            .iter()
            .map(|(product, _)| (product.product_id, product.unit_price()))
            .collect();
        let amount = order_amount(cart.total_amount(&catalog));

        Ok(PricedCheckout {
            address,
            lines,
            amount,
        })
    }

    async fn open_payment_session(
        &self,
        order: &OrderResponse,
        lines: &[(ProductModel, i32)],
        origin: &str,
    ) -> Result<CheckoutSession, ServiceError> {
        let origin = origin.trim_end_matches('/');

        let request = CheckoutSessionRequest {
            line_items: checkout_lines(lines),
            success_url: format!("{origin}/loader?next=my-orders"),
            cancel_url: format!("{origin}/cart"),
            metadata: PaymentMetadata {
                order_id: order.id,
                user_id: order.user_id,
            },
        };

        match self.gateway.create_checkout_session(&request).await {
            Ok(session) => Ok(session),
            Err(err) => {
                error!(
                    "❌ Checkout session for order {} failed, discarding order: {err}",
                    order.id
                );
                if let Err(cleanup) = self.command.delete_unpaid(order.id).await {
                    error!("❌ Failed to discard order {}: {cleanup}", order.id);
                }
                Err(match err {
                    ServiceError::Payment(msg) => ServiceError::Payment(msg),
                    other => ServiceError::Payment(other.to_string()),
                })
            }
        }
    }
}

/// Products at their untaxed price plus one tax line, so the processor
/// charges exactly the stored order amount.
fn checkout_lines(lines: &[(ProductModel, i32)]) -> Vec<CheckoutLineItem> {
    let mut items: Vec<CheckoutLineItem> = lines
        .iter()
        .map(|(product, quantity)| CheckoutLineItem {
            name: product.name.clone(),
            unit_amount: to_cents(product.unit_price().effective()),
            quantity: *quantity,
        })
        .collect();

    let subtotal: i64 = lines
        .iter()
        .map(|(product, quantity)| product.unit_price().effective() * i64::from(*quantity))
        .sum();
    let tax = tax_amount(subtotal);
    if tax > 0 {
        items.push(CheckoutLineItem {
            name: format!("Tax ({TAX_PERCENT}%)"),
            unit_amount: to_cents(tax),
            quantity: 1,
        });
    }

    items
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn place_order(
        &self,
        user_id: Option<i32>,
        req: &PlaceOrderRequest,
        method: PaymentMethod,
    ) -> Result<PlacedOrder, ServiceError> {
        let payment_type = method.payment_type();

        let tracing_ctx = self.observer.start_tracing(
            "place_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "place"),
                KeyValue::new("order.payment_type", payment_type.as_str()),
                KeyValue::new("order.lines", req.items.len() as i64),
            ],
        );

        let Some(user_id) = user_id else {
            return self.fail(&tracing_ctx, ServiceError::Unauthenticated);
        };

        info!("🏗️ Placing {payment_type} order for user {user_id}");

        let priced = match self.price_checkout(user_id, req).await {
            Ok(priced) => priced,
            Err(err) => return self.fail(&tracing_ctx, err),
        };

        let record = CreateOrderRecordRequest {
            user_id,
            amount: priced.amount,
            address_id: priced.address.address_id,
            payment_type,
            items: priced
                .lines
                .iter()
                .map(|(product, quantity)| CreateOrderItemRecordRequest {
                    product_id: product.product_id,
                    quantity: *quantity,
                    unit_price: product.unit_price().effective(),
                })
                .collect(),
        };

        let (order, items) = match self.command.create_order(&record).await {
            Ok(created) => created,
            Err(err) => return self.fail(&tracing_ctx, ServiceError::Repo(err)),
        };

        let products: HashMap<i32, &ProductModel> = priced
            .lines
            .iter()
            .map(|(product, _)| (product.product_id, product))
            .collect();

        let items = items
            .into_iter()
            .map(|item| {
                let product = products
                    .get(&item.product_id)
                    .map(|product| ProductResponse::from((*product).clone()));
                OrderItemResponse {
                    product,
                    ..OrderItemResponse::from(item)
                }
            })
            .collect();

        let mut response = OrderResponse::from_parts(order, items);
        response.address = Some(AddressResponse::from(priced.address));

        match method {
            PaymentMethod::CashOnDelivery => {
                self.observer.complete_tracing_success(
                    &tracing_ctx,
                    Method::Post,
                    &format!("COD order {} placed", response.id),
                );
                Ok(PlacedOrder::Accepted(response))
            }
            PaymentMethod::Online { origin } => {
                match self
                    .open_payment_session(&response, &priced.lines, &origin)
                    .await
                {
                    Ok(session) => {
                        self.observer.complete_tracing_success(
                            &tracing_ctx,
                            Method::Post,
                            &format!("Online order {} awaiting payment", response.id),
                        );
                        Ok(PlacedOrder::AwaitingPayment {
                            order: response,
                            session,
                        })
                    }
                    Err(err) => self.fail(&tracing_ctx, err),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::payment::MockPaymentGatewayTrait,
        domain::payment::PaymentType,
        test_support::InMemoryStore,
    };
    use shared::domain::CartLine;
    use std::sync::Arc;
    use testresult::TestResult;

    struct Fixture {
        store: InMemoryStore,
        user: i32,
        address: i32,
        apple: i32,
        bread: i32,
    }

    fn fixture() -> Fixture {
        let store = InMemoryStore::new();
        let user = store.add_user();
        let address = store.add_address(user);
        let apple = store.add_product("Apple", 100, Some(90));
        let bread = store.add_product("Bread", 50, None);
        Fixture {
            store,
            user,
            address,
            apple,
            bread,
        }
    }

    fn service(store: &InMemoryStore, gateway: MockPaymentGatewayTrait) -> OrderCommandService {
        OrderCommandService::new(
            OrderCommandServiceDeps {
                products: store.products(),
                addresses: store.addresses(),
                command: store.order_commands(),
                gateway: Arc::new(gateway),
            },
            &mut Registry::default(),
        )
    }

    fn no_gateway() -> MockPaymentGatewayTrait {
        let mut gateway = MockPaymentGatewayTrait::new();
        gateway.expect_create_checkout_session().never();
        gateway.expect_find_session_metadata().never();
        gateway
    }

    fn request(address: Option<i32>, items: Vec<CartLine>) -> PlaceOrderRequest {
        PlaceOrderRequest {
            items,
            address_id: address,
        }
    }

    #[tokio::test]
    async fn cod_order_uses_catalog_prices_and_floors_tax_once() -> TestResult {
        let f = fixture();
        let service = service(&f.store, no_gateway());

        let placed = service
            .place_order(
                Some(f.user),
                &request(
                    Some(f.address),
                    vec![CartLine::new(f.apple, 2), CartLine::new(f.bread, 1)],
                ),
                PaymentMethod::CashOnDelivery,
            )
            .await?;

        let PlacedOrder::Accepted(order) = placed else {
            panic!("cash on delivery must be accepted immediately");
        };
        assert_eq!(order.amount, 234);
        assert_eq!(order.payment_type, PaymentType::CashOnDelivery);
        assert!(!order.is_paid);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].unit_price, 90);
        assert_eq!(order.address.as_ref().map(|a| a.id), Some(f.address));
        assert_eq!(f.store.order_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn validation_runs_in_order_and_writes_nothing() {
        let f = fixture();
        let foreign_address = {
            let other = f.store.add_user();
            f.store.add_address(other)
        };
        let service = service(&f.store, no_gateway());
        let line = vec![CartLine::new(f.apple, 1)];

        let cases = [
            (None, request(None, Vec::new()), "Unauthenticated"),
            (Some(f.user), request(None, Vec::new()), "MissingAddress"),
            (Some(f.user), request(Some(999), line.clone()), "MissingAddress"),
            (
                Some(f.user),
                request(Some(foreign_address), line.clone()),
                "MissingAddress",
            ),
            (Some(f.user), request(Some(f.address), Vec::new()), "EmptyCart"),
            (
                Some(f.user),
                request(Some(f.address), vec![CartLine::new(f.apple, 0)]),
                "InvalidQuantity",
            ),
        ];

        for (user, req, expected) in cases {
            let result = service
                .place_order(user, &req, PaymentMethod::CashOnDelivery)
                .await;
            let matched = match (&result, expected) {
                (Err(ServiceError::Unauthenticated), "Unauthenticated") => true,
                (Err(ServiceError::MissingAddress), "MissingAddress") => true,
                (Err(ServiceError::EmptyCart), "EmptyCart") => true,
                (Err(ServiceError::InvalidQuantity(0)), "InvalidQuantity") => true,
                _ => false,
            };
            assert!(matched, "expected {expected}, got {result:?}");
        }

        assert_eq!(f.store.order_count(), 0);
    }

    #[tokio::test]
    async fn deleted_product_aborts_the_whole_order() {
        let f = fixture();
        f.store.remove_product(f.bread);
        let service = service(&f.store, no_gateway());

        let result = service
            .place_order(
                Some(f.user),
                &request(
                    Some(f.address),
                    vec![CartLine::new(f.apple, 2), CartLine::new(f.bread, 1)],
                ),
                PaymentMethod::CashOnDelivery,
            )
            .await;

        assert!(matches!(result, Err(ServiceError::ProductNotFound(id)) if id == f.bread));
        assert_eq!(f.store.order_count(), 0);
    }

    #[tokio::test]
    async fn online_order_opens_a_session_with_a_tax_line_and_metadata() -> TestResult {
        let f = fixture();
        let (user, apple, bread) = (f.user, f.apple, f.bread);

        let mut gateway = MockPaymentGatewayTrait::new();
        gateway
            .expect_create_checkout_session()
            .once()
            .withf(move |req| {
                req.success_url == "https://shop.test/loader?next=my-orders"
                    && req.cancel_url == "https://shop.test/cart"
                    && req.metadata.user_id == user
                    && req.line_items
                        == vec![
                            CheckoutLineItem {
                                name: "Apple".into(),
                                unit_amount: 9_000,
                                quantity: 2,
                            },
                            CheckoutLineItem {
                                name: "Bread".into(),
                                unit_amount: 5_000,
                                quantity: 1,
                            },
                            CheckoutLineItem {
                                name: "Tax (2%)".into(),
                                unit_amount: 400,
                                quantity: 1,
                            },
                        ]
            })
            .returning(|req| {
                Ok(CheckoutSession {
                    id: "cs_test".into(),
                    url: format!("https://checkout.test/{}", req.metadata.order_id),
                })
            });

        let service = service(&f.store, gateway);

        let placed = service
            .place_order(
                Some(user),
                &request(
                    Some(f.address),
                    vec![CartLine::new(apple, 2), CartLine::new(bread, 1)],
                ),
                PaymentMethod::Online {
                    origin: "https://shop.test/".into(),
                },
            )
            .await?;

        let PlacedOrder::AwaitingPayment { order, session } = placed else {
            panic!("online orders wait for the processor");
        };
        assert_eq!(order.amount, 234);
        assert_eq!(order.payment_type, PaymentType::Online);
        assert!(!order.is_paid);
        assert_eq!(session.url, format!("https://checkout.test/{}", order.id));
        Ok(())
    }

    #[tokio::test]
    async fn charged_total_matches_the_stored_amount() -> TestResult {
        let f = fixture();
        let odd = f.store.add_product("Pencil", 3, None);
        let (apple, bread) = (f.apple, f.bread);
        let carts = [
            vec![CartLine::new(apple, 2), CartLine::new(bread, 1)],
            vec![CartLine::new(bread, 7), CartLine::new(odd, 3)],
            vec![CartLine::new(odd, 1)],
            vec![CartLine::new(apple, 13)],
        ];

        for items in carts {
            let charged = Arc::new(std::sync::Mutex::new(0_i64));
            let mut gateway = MockPaymentGatewayTrait::new();
            let seen = charged.clone();
            gateway
                .expect_create_checkout_session()
                .once()
                .returning(move |req| {
                    *seen.lock().expect("lock") = req
                        .line_items
                        .iter()
                        .map(|item| item.unit_amount * i64::from(item.quantity))
                        .sum();
                    Ok(CheckoutSession {
                        id: "cs_test".into(),
                        url: "https://checkout.test".into(),
                    })
                });

            let placed = service(&f.store, gateway)
                .place_order(
                    Some(f.user),
                    &request(Some(f.address), items),
                    PaymentMethod::Online {
                        origin: "https://shop.test".into(),
                    },
                )
                .await?;

            let PlacedOrder::AwaitingPayment { order, .. } = placed else {
                panic!("online orders wait for the processor");
            };
            assert_eq!(*charged.lock().expect("lock"), order.amount * 100);
        }
        Ok(())
    }

    #[tokio::test]
    async fn failed_session_discards_the_unpaid_order() {
        let f = fixture();

        let mut gateway = MockPaymentGatewayTrait::new();
        gateway
            .expect_create_checkout_session()
            .once()
            .returning(|_| Err(ServiceError::Payment("stripe is down".into())));

        let service = service(&f.store, gateway);

        let result = service
            .place_order(
                Some(f.user),
                &request(Some(f.address), vec![CartLine::new(f.apple, 1)]),
                PaymentMethod::Online {
                    origin: "https://shop.test".into(),
                },
            )
            .await;

        assert!(matches!(result, Err(ServiceError::Payment(_))));
        assert_eq!(f.store.order_count(), 0);
    }
}
