use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use shared::domain::{Cart, CartError, CartLine};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub type DynCartSync = Arc<dyn CartSyncTrait + Send + Sync>;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Cart request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storefront rejected the cart ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Storefront returned a malformed cart: {0}")]
    Malformed(#[from] CartError),
}

/// Where cart snapshots are persisted.
#[async_trait]
pub trait CartSyncTrait {
    /// Replaces the stored cart with `cart`.
    async fn push(&self, cart: &Cart) -> Result<(), SyncError>;
    async fn fetch(&self) -> Result<Cart, SyncError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCartBody<'a> {
    cart_items: &'a [CartLine],
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<Vec<CartLine>>,
}

/// Talks to the storefront cart endpoints with the shopper's session token.
#[derive(Clone)]
pub struct HttpCartSync {
    http: Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for HttpCartSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCartSync")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpCartSync {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    async fn envelope(response: Response) -> Result<Envelope, SyncError> {
        let status = response.status();
        let envelope: Envelope = match response.json().await {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => Envelope {
                success: false,
                message: status.to_string(),
                data: None,
            },
            Err(err) => return Err(err.into()),
        };

        if !status.is_success() || !envelope.success {
            return Err(SyncError::Rejected {
                status: status.as_u16(),
                message: envelope.message,
            });
        }

        Ok(envelope)
    }
}

#[async_trait]
impl CartSyncTrait for HttpCartSync {
    async fn push(&self, cart: &Cart) -> Result<(), SyncError> {
        let response = self
            .http
            .post(format!("{}/api/cart/update", self.base_url))
            .bearer_auth(&self.token)
            .json(&UpdateCartBody {
                cart_items: cart.lines(),
            })
            .send()
            .await?;

        Self::envelope(response).await?;
        debug!("🛒 Pushed cart with {} lines", cart.len());
        Ok(())
    }

    async fn fetch(&self) -> Result<Cart, SyncError> {
        let response = self
            .http
            .get(format!("{}/api/cart", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;

        let lines = Self::envelope(response).await?.data.unwrap_or_default();
        Ok(Cart::try_from_lines(lines)?)
    }
}
