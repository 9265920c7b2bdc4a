use shared::domain::Cart;
use sqlx::{FromRow, types::Json};

/// The persisted cart snapshot stored on the user row.
#[derive(Debug, FromRow)]
pub struct UserCart {
    pub user_id: i32,
    pub cart_items: Json<Cart>,
}
