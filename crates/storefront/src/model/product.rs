use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shared::domain::UnitPrice;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: i64,
    pub offer_price: Option<i64>,
    pub images: Vec<String>,
    pub in_stock: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Product {
    pub fn unit_price(&self) -> UnitPrice {
        UnitPrice::new(self.price, self.offer_price)
    }
}
