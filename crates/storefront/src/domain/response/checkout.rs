use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Where to send the shopper to pay for a freshly placed online order.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: i32,
    pub url: String,
}
