use crate::domain::response::order::OrderResponse;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

/// How an order is stored: `COD` or `Online`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentType {
    #[serde(rename = "COD")]
    CashOnDelivery,
    Online,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::CashOnDelivery => "COD",
            PaymentType::Online => "Online",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COD" => Ok(PaymentType::CashOnDelivery),
            "Online" => Ok(PaymentType::Online),
            other => Err(format!("unknown payment type '{other}'")),
        }
    }
}

/// The payment method chosen at checkout. Online checkout needs the origin
/// of the storefront the shopper came from to build the redirect urls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    CashOnDelivery,
    Online { origin: String },
}

impl PaymentMethod {
    pub fn payment_type(&self) -> PaymentType {
        match self {
            PaymentMethod::CashOnDelivery => PaymentType::CashOnDelivery,
            PaymentMethod::Online { .. } => PaymentType::Online,
        }
    }
}

/// Correlation data carried through the payment processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentMetadata {
    pub order_id: i32,
    pub user_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLineItem {
    pub name: String,
    /// Unit price in cents.
    pub unit_amount: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    pub line_items: Vec<CheckoutLineItem>,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: PaymentMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub enum PlacedOrder {
    Accepted(OrderResponse),
    AwaitingPayment {
        order: OrderResponse,
        session: CheckoutSession,
    },
}

/// A verified processor callback reduced to the transition it asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    Succeeded { order_id: i32, user_id: i32 },
    Failed { order_id: i32, user_id: i32 },
    Ignored { kind: String },
}

/// What marking an order as paid actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaidTransition {
    Marked,
    AlreadyPaid,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    MarkedPaid,
    AlreadyPaid,
    Discarded,
    AlreadyGone,
    Ignored,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_type_round_trips_through_its_storage_tag() {
        for kind in [PaymentType::CashOnDelivery, PaymentType::Online] {
            assert_eq!(kind.as_str().parse::<PaymentType>(), Ok(kind));
        }
        assert!("Card".parse::<PaymentType>().is_err());
    }
}
