use crate::domain::payment::{
    CheckoutSession, CheckoutSessionRequest, PaymentEvent, PaymentMetadata, ReconcileOutcome,
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynPaymentGateway = Arc<dyn PaymentGatewayTrait + Send + Sync>;
pub type DynPaymentEventService = Arc<dyn PaymentEventServiceTrait + Send + Sync>;

/// The external payment processor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGatewayTrait {
    async fn create_checkout_session(
        &self,
        req: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, ServiceError>;

    /// Correlation metadata of the checkout session that created
    /// `payment_intent_id`, if there is one.
    async fn find_session_metadata(
        &self,
        payment_intent_id: &str,
    ) -> Result<Option<PaymentMetadata>, ServiceError>;
}

#[async_trait]
pub trait PaymentEventServiceTrait {
    /// Verifies a raw webhook delivery and applies it.
    async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<ReconcileOutcome, ServiceError>;

    async fn reconcile(&self, event: PaymentEvent) -> Result<ReconcileOutcome, ServiceError>;
}
