use crate::{
    abstract_trait::order::{DynOrderCommandService, DynOrderQueryService},
    domain::{
        payment::{PaymentMethod, PlacedOrder},
        requests::order::PlaceOrderRequest,
        response::{api::ApiResponse, checkout::CheckoutResponse, order::OrderResponse},
    },
    middleware::{
        jwt::{auth_middleware, seller_middleware},
        validate::SimpleValidatedJson,
    },
    state::{AppState, ClientUrl},
};
use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/order/cod",
    tag = "Order",
    security(("bearer_auth" = [])),
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Missing address, empty cart or unknown product"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn place_cod_order(
    Extension(service): Extension<DynOrderCommandService>,
    Extension(user_id): Extension<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<PlaceOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let placed = service
        .place_order(Some(user_id), &body, PaymentMethod::CashOnDelivery)
        .await?;

    let order = match placed {
        PlacedOrder::Accepted(order) | PlacedOrder::AwaitingPayment { order, .. } => order,
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Order Placed", order)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/order/stripe",
    tag = "Order",
    security(("bearer_auth" = [])),
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Checkout session opened", body = ApiResponse<CheckoutResponse>),
        (status = 400, description = "Missing address, empty cart or unknown product"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Payment processor unavailable")
    )
)]
pub async fn place_stripe_order(
    Extension(service): Extension<DynOrderCommandService>,
    Extension(ClientUrl(client_url)): Extension<ClientUrl>,
    Extension(user_id): Extension<i32>,
    headers: HeaderMap,
    SimpleValidatedJson(body): SimpleValidatedJson<PlaceOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty() && *value != "null")
        .map(str::to_owned)
        .unwrap_or(client_url);

    let placed = service
        .place_order(Some(user_id), &body, PaymentMethod::Online { origin })
        .await?;

    let PlacedOrder::AwaitingPayment { order, session } = placed else {
        return Err(HttpError::Internal(
            "Online order was accepted without a checkout session".into(),
        ));
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Checkout session created",
            CheckoutResponse {
                order_id: order.id,
                url: session.url,
            },
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/order/user",
    tag = "Order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own orders, newest first", body = ApiResponse<Vec<OrderResponse>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_user_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Extension(user_id): Extension<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.list_for_user(user_id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/order",
    tag = "Order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All orders, newest first", body = ApiResponse<Vec<OrderResponse>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a seller token")
    )
)]
pub async fn list_all_orders(
    Extension(service): Extension<DynOrderQueryService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.list_all().await?;
    Ok(Json(response))
}

pub fn order_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let shopper = OpenApiRouter::new()
        .route("/api/order/cod", post(place_cod_order))
        .route("/api/order/stripe", post(place_stripe_order))
        .route("/api/order/user", get(list_user_orders))
        .route_layer(middleware::from_fn(auth_middleware));

    let seller = OpenApiRouter::new()
        .route("/api/order", get(list_all_orders))
        .route("/api/order/", get(list_all_orders))
        .route_layer(middleware::from_fn(seller_middleware));

    shopper
        .merge(seller)
        .layer(Extension(app_state.di_container.order_command.clone()))
        .layer(Extension(app_state.di_container.order_query.clone()))
        .layer(Extension(ClientUrl(app_state.client_url.clone())))
        .layer(Extension(app_state.jwt_config.clone()))
}
