use crate::domain::payment::PaymentType;
use serde::{Deserialize, Serialize};
use shared::domain::CartLine;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub items: Vec<CartLine>,
    pub address_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct CreateOrderItemRecordRequest {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: i64,
}

#[derive(Debug, Clone)]
pub struct CreateOrderRecordRequest {
    pub user_id: i32,
    pub amount: i64,
    pub address_id: i32,
    pub payment_type: PaymentType,
    pub items: Vec<CreateOrderItemRecordRequest>,
}
