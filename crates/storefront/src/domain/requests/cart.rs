use serde::{Deserialize, Serialize};
use shared::domain::CartLine;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    #[serde(default)]
    pub cart_items: Vec<CartLine>,
}
