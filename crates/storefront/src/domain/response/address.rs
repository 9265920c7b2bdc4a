use crate::model::address::Address as AddressModel;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub id: i32,
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
    pub phone: String,
    pub created_at: Option<String>,
}

impl From<AddressModel> for AddressResponse {
    fn from(value: AddressModel) -> Self {
        AddressResponse {
            id: value.address_id,
            user_id: value.user_id,
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            street: value.street,
            city: value.city,
            state: value.state,
            country: value.country,
            zip_code: value.zip_code,
            phone: value.phone,
            created_at: value.created_at.map(|dt| dt.to_string()),
        }
    }
}
