use crate::{
    abstract_trait::payment::DynPaymentEventService, domain::response::api::WebhookReceipt,
    state::AppState,
};
use axum::{
    Json,
    body::Bytes,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use shared::errors::HttpError;
use std::sync::Arc;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;

const SIGNATURE_HEADER: &str = "stripe-signature";

/// Stripe delivers events here. The body must stay byte-for-byte intact for
/// signature verification, so it is taken as raw bytes.
#[utoipa::path(
    post,
    path = "/stripe",
    tag = "Payment",
    request_body(content = String, description = "Raw Stripe event", content_type = "application/json"),
    responses(
        (status = 200, description = "Event acknowledged", body = WebhookReceipt),
        (status = 400, description = "Missing or invalid signature"),
        (status = 500, description = "Event could not be applied")
    )
)]
pub async fn stripe_webhook(
    Extension(service): Extension<DynPaymentEventService>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let outcome = service.handle_webhook(&body, signature).await?;
    info!("📬 Stripe webhook handled: {outcome:?}");

    Ok((StatusCode::OK, Json(WebhookReceipt { received: true })))
}

pub fn webhook_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/stripe", post(stripe_webhook))
        .layer(Extension(app_state.di_container.payment_events.clone()))
}
