use crate::{
    abstract_trait::{
        address::{DynAddressRepository, DynAddressService},
        cart::{DynCartRepository, DynCartService},
        order::{
            DynOrderCommandRepository, DynOrderCommandService, DynOrderQueryRepository,
            DynOrderQueryService,
        },
        payment::{DynPaymentEventService, DynPaymentGateway},
        product::{DynProductRepository, DynProductService},
    },
    payment::{StripeConfig, StripeGateway, WebhookVerifier},
    repository::{
        AddressRepository, CartRepository, OrderCommandRepository, OrderQueryRepository,
        ProductRepository,
    },
    service::{
        AddressService, CartService, OrderCommandService, OrderCommandServiceDeps,
        OrderQueryService, OrderQueryServiceDeps, PaymentEventService, PaymentEventServiceDeps,
        ProductService,
    },
};
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::{fmt, sync::Arc};

/// The storage and payment seams every service is built from.
#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub carts: DynCartRepository,
    pub products: DynProductRepository,
    pub addresses: DynAddressRepository,
    pub order_commands: DynOrderCommandRepository,
    pub order_queries: DynOrderQueryRepository,
    pub gateway: DynPaymentGateway,
    pub verifier: WebhookVerifier,
}

impl DependenciesInjectDeps {
    pub fn postgres(pool: ConnectionPool, stripe: StripeConfig, webhook_secret: &str) -> Self {
        Self {
            carts: Arc::new(CartRepository::new(pool.clone())),
            products: Arc::new(ProductRepository::new(pool.clone())),
            addresses: Arc::new(AddressRepository::new(pool.clone())),
            order_commands: Arc::new(OrderCommandRepository::new(pool.clone())),
            order_queries: Arc::new(OrderQueryRepository::new(pool)),
            gateway: Arc::new(StripeGateway::new(stripe)),
            verifier: WebhookVerifier::new(webhook_secret),
        }
    }
}

#[derive(Clone)]
pub struct DependenciesInject {
    pub cart_service: DynCartService,
    pub product_service: DynProductService,
    pub address_service: DynAddressService,
    pub order_command: DynOrderCommandService,
    pub order_query: DynOrderQueryService,
    pub payment_events: DynPaymentEventService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("cart_service", &"DynCartService")
            .field("product_service", &"DynProductService")
            .field("address_service", &"DynAddressService")
            .field("order_command", &"DynOrderCommandService")
            .field("order_query", &"DynOrderQueryService")
            .field("payment_events", &"DynPaymentEventService")
            .finish()
    }
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps, registry: &mut Registry) -> Self {
        let DependenciesInjectDeps {
            carts,
            products,
            addresses,
            order_commands,
            order_queries,
            gateway,
            verifier,
        } = deps;

        let cart_service: DynCartService = Arc::new(CartService::new(carts.clone(), registry));

        let product_service: DynProductService =
            Arc::new(ProductService::new(products.clone(), registry));

        let address_service: DynAddressService =
            Arc::new(AddressService::new(addresses.clone(), registry));

        let order_command: DynOrderCommandService = Arc::new(OrderCommandService::new(
            OrderCommandServiceDeps {
                products: products.clone(),
                addresses: addresses.clone(),
                command: order_commands.clone(),
                gateway: gateway.clone(),
            },
            registry,
        ));

        let order_query: DynOrderQueryService = Arc::new(OrderQueryService::new(
            OrderQueryServiceDeps {
                query: order_queries,
                products,
                addresses,
            },
            registry,
        ));

        let payment_events: DynPaymentEventService = Arc::new(PaymentEventService::new(
            PaymentEventServiceDeps {
                orders: order_commands,
                carts,
                gateway,
                verifier,
            },
            registry,
        ));

        Self {
            cart_service,
            product_service,
            address_service,
            order_command,
            order_query,
            payment_events,
        }
    }
}
