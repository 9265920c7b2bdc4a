use crate::{
    domain::{
        payment::PaymentType,
        response::{address::AddressResponse, product::ProductResponse},
    },
    model::order::{Order as OrderModel, OrderItem as OrderItemModel},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: i64,
    /// Absent when the product could not be resolved.
    pub product: Option<ProductResponse>,
}

impl From<OrderItemModel> for OrderItemResponse {
    fn from(value: OrderItemModel) -> Self {
        OrderItemResponse {
            product_id: value.product_id,
            quantity: value.quantity,
            unit_price: value.unit_price,
            product: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i32,
    pub user_id: i32,
    pub items: Vec<OrderItemResponse>,
    pub amount: i64,
    pub address_id: i32,
    pub address: Option<AddressResponse>,
    pub payment_type: PaymentType,
    pub is_paid: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl OrderResponse {
    /// Builds a response from an order row and its lines. The schema only
    /// admits `COD` and `Online` tags.
    pub fn from_parts(order: OrderModel, items: Vec<OrderItemResponse>) -> Self {
        let payment_type = order
            .payment_type
            .parse()
            .unwrap_or(PaymentType::Online);

        OrderResponse {
            id: order.order_id,
            user_id: order.user_id,
            items,
            amount: order.amount,
            address_id: order.address_id,
            address: None,
            payment_type,
            is_paid: order.is_paid,
            created_at: order.created_at.map(|dt| dt.to_string()),
            updated_at: order.updated_at.map(|dt| dt.to_string()),
        }
    }
}
