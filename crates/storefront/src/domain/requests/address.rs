use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "Email must be valid"))]
    pub email: String,

    #[validate(length(min = 1, message = "Street is required"))]
    pub street: String,

    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,

    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,

    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,

    #[validate(length(min = 1, max = 20, message = "Zip code is required"))]
    pub zip_code: String,

    #[validate(length(min = 5, max = 30, message = "Phone number is required"))]
    pub phone: String,
}

/// The client wraps the address fields in an `address` object.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct AddAddressRequest {
    #[validate(nested)]
    pub address: CreateAddressRequest,
}

#[derive(Debug, Clone)]
pub struct CreateAddressRecordRequest {
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
}

impl CreateAddressRecordRequest {
    pub fn new(user_id: i32, req: &CreateAddressRequest) -> Self {
        Self {
            user_id,
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            email: req.email.clone(),
            street: req.street.clone(),
            city: req.city.clone(),
            state: req.state.clone(),
            country: req.country.clone(),
            zip_code: req.zip_code.clone(),
            phone: req.phone.clone(),
        }
    }
}
