mod address;
mod cart;
mod order;
mod product;
mod webhook;


use crate::state::AppState;
use anyhow::{Context, Result};
use axum::{
    Router,
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus_client::encoding::text::encode;
use shared::utils::shutdown_signal;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

pub use self::address::address_routes;
pub use self::cart::cart_routes;
pub use self::order::order_routes;
pub use self::product::product_routes;
pub use self::webhook::webhook_routes;

const BODY_LIMIT: usize = 4 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        cart::update_cart,
        cart::get_cart,

        order::place_cod_order,
        order::place_stripe_order,
        order::list_user_orders,
        order::list_all_orders,

        address::add_address,
        address::list_addresses,

        product::list_products,
        product::get_product,

        webhook::stripe_webhook,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Cart", description = "Persisted cart snapshot"),
        (name = "Order", description = "Checkout and order history"),
        (name = "Address", description = "Delivery addresses"),
        (name = "Product", description = "Catalog lookups"),
        (name = "Payment", description = "Payment processor callbacks"),
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

pub async fn health_handler() -> &'static str {
    "API Working"
}

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut buffer = String::new();

    let registry = state.registry.lock().await;

    if let Err(e) = encode(&mut buffer, &registry) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {e}"),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        Body::from(buffer),
    )
        .into_response()
}

pub struct AppRouter;

impl AppRouter {
    /// The full application: API routes, metrics, health and Swagger UI.
    pub fn router(state: Arc<AppState>) -> Result<Router> {
        let cors = CorsLayer::new()
            .allow_origin(
                state
                    .client_url
                    .parse::<HeaderValue>()
                    .context("CLIENT_URL is not a valid origin")?,
            )
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true);

        let api_router = OpenApiRouter::with_openapi(ApiDoc::openapi())
            .route("/", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .with_state(state.clone())
            .merge(cart_routes(state.clone()))
            .merge(order_routes(state.clone()))
            .merge(address_routes(state.clone()))
            .merge(product_routes(state.clone()))
            .merge(webhook_routes(state.clone()));

        let router_with_layers = api_router
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(BODY_LIMIT));

        let (app_router, api) = router_with_layers.split_for_parts();

        Ok(app_router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
            .layer(TraceLayer::new_for_http())
            .layer(cors))
    }

    pub async fn serve(port: u16, state: AppState) -> Result<()> {
        let app = Self::router(Arc::new(state))?;

        let addr = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        info!("🚀 Server running on http://{}", listener.local_addr()?);
        info!("📖 Swagger UI: http://localhost:{port}/swagger-ui");
        info!("📊 Metrics: http://localhost:{port}/metrics");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server terminated unexpectedly")?;

        Ok(())
    }
}
