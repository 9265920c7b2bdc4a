use crate::{
    abstract_trait::{
        cart::DynCartRepository,
        order::DynOrderCommandRepository,
        payment::{DynPaymentGateway, PaymentEventServiceTrait},
    },
    domain::payment::{PaidTransition, PaymentEvent, PaymentMetadata, ReconcileOutcome},
    payment::{PAYMENT_FAILED, PAYMENT_SUCCEEDED, StripeEvent, WebhookVerifier},
};
use async_trait::async_trait;
use chrono::Utc;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    domain::Cart,
    errors::{RepositoryError, ServiceError},
    utils::{Method, ServiceObserver},
};
use tracing::{info, warn};

/// Applies payment processor callbacks to orders.
///
/// Every transition is safe to repeat and to receive out of order. The cart
/// is cleared only when an order actually moves from unpaid to paid, and
/// discarding tolerates a missing order.
#[derive(Clone)]
pub struct PaymentEventService {
    orders: DynOrderCommandRepository,
    carts: DynCartRepository,
    gateway: DynPaymentGateway,
    verifier: WebhookVerifier,
    observer: ServiceObserver,
}

pub struct PaymentEventServiceDeps {
    pub orders: DynOrderCommandRepository,
    pub carts: DynCartRepository,
    pub gateway: DynPaymentGateway,
    pub verifier: WebhookVerifier,
}

impl PaymentEventService {
    pub fn new(deps: PaymentEventServiceDeps, registry: &mut Registry) -> Self {
        let PaymentEventServiceDeps {
            orders,
            carts,
            gateway,
            verifier,
        } = deps;

        Self {
            orders,
            carts,
            gateway,
            verifier,
            observer: ServiceObserver::new(
                "payment-event-service",
                "PaymentEventService",
                registry,
            ),
        }
    }

    /// Reduces a Stripe event to the transition it requests.
    async fn resolve(&self, event: StripeEvent) -> Result<PaymentEvent, ServiceError> {
        let succeeded = match event.kind.as_str() {
            PAYMENT_SUCCEEDED => true,
            PAYMENT_FAILED => false,
            _ => return Ok(PaymentEvent::Ignored { kind: event.kind }),
        };

        let intent = event.data.object;
        let metadata = match PaymentMetadata::from_stripe(&intent.metadata) {
            Some(metadata) => Some(metadata),
            None => self.gateway.find_session_metadata(&intent.id).await?,
        };

        let Some(PaymentMetadata { order_id, user_id }) = metadata else {
            warn!(
                "⚠️ Event {} for payment intent {} carries no order reference",
                event.id, intent.id
            );
            return Ok(PaymentEvent::Ignored { kind: event.kind });
        };

        Ok(if succeeded {
            PaymentEvent::Succeeded { order_id, user_id }
        } else {
            PaymentEvent::Failed { order_id, user_id }
        })
    }

    async fn apply(&self, event: PaymentEvent) -> Result<ReconcileOutcome, ServiceError> {
        match event {
            PaymentEvent::Succeeded { order_id, user_id } => {
                match self.orders.mark_paid(order_id).await? {
                    PaidTransition::Marked => {}
                    PaidTransition::AlreadyPaid => {
                        info!("🔁 Order {order_id} already paid, cart left as is");
                        return Ok(ReconcileOutcome::AlreadyPaid);
                    }
                    PaidTransition::Missing => {
                        warn!("⚠️ Paid order {order_id} no longer exists");
                        return Ok(ReconcileOutcome::AlreadyGone);
                    }
                }

                match self.carts.save_cart(user_id, &Cart::new()).await {
                    Ok(()) => info!("🧹 Cleared cart of user {user_id}"),
                    Err(RepositoryError::NotFound) => {
                        warn!("⚠️ User {user_id} of paid order {order_id} not found")
                    }
                    Err(err) => return Err(err.into()),
                }

                Ok(ReconcileOutcome::MarkedPaid)
            }
            PaymentEvent::Failed { order_id, user_id } => {
                if self.orders.delete_unpaid(order_id).await? {
                    info!("🗑️ Discarded order {order_id} of user {user_id} after failed payment");
                    Ok(ReconcileOutcome::Discarded)
                } else {
                    warn!("⚠️ Failed payment for order {order_id} which is gone or already paid");
                    Ok(ReconcileOutcome::AlreadyGone)
                }
            }
            PaymentEvent::Ignored { kind } => {
                warn!("⚠️ Unhandled payment event type: {kind}");
                Ok(ReconcileOutcome::Ignored)
            }
        }
    }
}

#[async_trait]
impl PaymentEventServiceTrait for PaymentEventService {
    async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<ReconcileOutcome, ServiceError> {
        let signature = signature.ok_or_else(|| {
            ServiceError::WebhookSignature("missing Stripe-Signature header".into())
        })?;

        self.verifier
            .verify(payload, signature, Utc::now().timestamp())?;

        let event: StripeEvent = serde_json::from_slice(payload).map_err(|e| {
            ServiceError::Validation(vec![format!("malformed payment event: {e}")])
        })?;

        info!("📨 Payment event {} of type {}", event.id, event.kind);

        let event = self.resolve(event).await?;
        self.reconcile(event).await
    }

    async fn reconcile(&self, event: PaymentEvent) -> Result<ReconcileOutcome, ServiceError> {
        let kind = match &event {
            PaymentEvent::Succeeded { .. } => "succeeded",
            PaymentEvent::Failed { .. } => "failed",
            PaymentEvent::Ignored { .. } => "ignored",
        };

        let tracing_ctx = self.observer.start_tracing(
            "reconcile_payment",
            vec![
                KeyValue::new("component", "payment"),
                KeyValue::new("operation", "reconcile"),
                KeyValue::new("payment.event", kind),
            ],
        );

        match self.apply(event).await {
            Ok(outcome) => {
                self.observer.complete_tracing_success(
                    &tracing_ctx,
                    Method::Post,
                    &format!("Payment event {kind} reconciled: {outcome:?}"),
                );
                Ok(outcome)
            }
            Err(err) => {
                self.observer.complete_tracing_error(
                    &tracing_ctx,
                    Method::Post,
                    &format!("Payment event {kind} failed: {err}"),
                );
                Err(err)
            }
        }
    }
}
