mod event;
mod signature;
mod stripe;

pub use self::event::{PAYMENT_FAILED, PAYMENT_SUCCEEDED, StripeEvent, StripeEventData, StripeObject};
pub use self::signature::WebhookVerifier;
pub use self::stripe::{StripeConfig, StripeGateway};
