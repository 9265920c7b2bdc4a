use crate::{
    abstract_trait::address::DynAddressService,
    domain::{
        requests::address::AddAddressRequest,
        response::{address::AddressResponse, api::ApiResponse},
    },
    middleware::{jwt::auth_middleware, validate::SimpleValidatedJson},
    state::AppState,
};
use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/address/add",
    tag = "Address",
    security(("bearer_auth" = [])),
    request_body = AddAddressRequest,
    responses(
        (status = 200, description = "Address stored", body = ApiResponse<AddressResponse>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn add_address(
    Extension(service): Extension<DynAddressService>,
    Extension(user_id): Extension<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<AddAddressRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.add_address(user_id, &body.address).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/address/get",
    tag = "Address",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Addresses, default first", body = ApiResponse<Vec<AddressResponse>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_addresses(
    Extension(service): Extension<DynAddressService>,
    Extension(user_id): Extension<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.list_for_user(user_id).await?;
    Ok(Json(response))
}

pub fn address_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/address/add", post(add_address))
        .route("/api/address/get", get(list_addresses))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.address_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
