use crate::domain::payment::PaymentMetadata;
use serde::Deserialize;
use std::collections::HashMap;

pub const PAYMENT_SUCCEEDED: &str = "payment_intent.succeeded";
pub const PAYMENT_FAILED: &str = "payment_intent.payment_failed";

const ORDER_ID_KEY: &str = "orderId";
const USER_ID_KEY: &str = "userId";

/// The subset of a Stripe event envelope the storefront reads.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: StripeEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeEventData {
    pub object: StripeObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeObject {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl PaymentMetadata {
    pub fn to_pairs(self) -> [(&'static str, String); 2] {
        [
            (ORDER_ID_KEY, self.order_id.to_string()),
            (USER_ID_KEY, self.user_id.to_string()),
        ]
    }

    /// Reads `{orderId, userId}` back out of Stripe metadata.
    pub fn from_stripe(metadata: &HashMap<String, String>) -> Option<Self> {
        let order_id = metadata.get(ORDER_ID_KEY)?.parse().ok()?;
        let user_id = metadata.get(USER_ID_KEY)?.parse().ok()?;
        Some(Self { order_id, user_id })
    }
}
