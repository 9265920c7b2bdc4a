use crate::{
    abstract_trait::payment::PaymentGatewayTrait,
    domain::payment::{CheckoutSession, CheckoutSessionRequest, PaymentMetadata},
    payment::event::StripeObject,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::errors::ServiceError;
use tracing::{error, info};

#[derive(Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub currency: String,
    pub api_base: String,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("currency", &self.currency)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Stripe Checkout over its form-encoded REST API.
#[derive(Debug, Clone)]
pub struct StripeGateway {
    config: StripeConfig,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct SessionCreated {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionList {
    data: Vec<StripeObject>,
}

impl StripeGateway {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base.trim_end_matches('/'))
    }

    /// Flattens a checkout request into Stripe's bracketed form keys.
    fn checkout_form(&self, req: &CheckoutSessionRequest) -> Vec<(String, String)> {
        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), req.success_url.clone()),
            ("cancel_url".to_string(), req.cancel_url.clone()),
        ];

        for (i, item) in req.line_items.iter().enumerate() {
            let prefix = format!("line_items[{i}]");
            form.push((
                format!("{prefix}[price_data][currency]"),
                self.config.currency.clone(),
            ));
            form.push((
                format!("{prefix}[price_data][product_data][name]"),
                item.name.clone(),
            ));
            form.push((
                format!("{prefix}[price_data][unit_amount]"),
                item.unit_amount.to_string(),
            ));
            form.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
        }

        for (key, value) in req.metadata.to_pairs() {
            form.push((format!("metadata[{key}]"), value.clone()));
            form.push((format!("payment_intent_data[metadata][{key}]"), value));
        }

        form
    }

    async fn read_failure(response: reqwest::Response) -> String {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        format!("stripe request failed with status {status}: {text}")
    }
}

#[async_trait]
impl PaymentGatewayTrait for StripeGateway {
    async fn create_checkout_session(
        &self,
        req: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, ServiceError> {
        let response = self
            .http
            .post(self.endpoint("/v1/checkout/sessions"))
            .bearer_auth(&self.config.secret_key)
            .form(&self.checkout_form(req))
            .send()
            .await
            .map_err(|e| {
                error!("❌ Stripe unreachable: {e}");
                ServiceError::Payment(e.to_string())
            })?;

        if !response.status().is_success() {
            let message = Self::read_failure(response).await;
            error!("❌ {message}");
            return Err(ServiceError::Payment(message));
        }

        let created: SessionCreated = response
            .json()
            .await
            .map_err(|e| ServiceError::Payment(format!("unexpected session payload: {e}")))?;

        let url = created
            .url
            .ok_or_else(|| ServiceError::Payment("checkout session has no url".into()))?;

        info!(
            "💳 Opened checkout session {} for order {}",
            created.id, req.metadata.order_id
        );

        Ok(CheckoutSession {
            id: created.id,
            url,
        })
    }

    async fn find_session_metadata(
        &self,
        payment_intent_id: &str,
    ) -> Result<Option<PaymentMetadata>, ServiceError> {
        let response = self
            .http
            .get(self.endpoint("/v1/checkout/sessions"))
            .bearer_auth(&self.config.secret_key)
            .query(&[("payment_intent", payment_intent_id), ("limit", "1")])
            .send()
            .await
            .map_err(|e| {
                error!("❌ Stripe unreachable: {e}");
                ServiceError::Payment(e.to_string())
            })?;

        if !response.status().is_success() {
            let message = Self::read_failure(response).await;
            error!("❌ {message}");
            return Err(ServiceError::Payment(message));
        }

        let sessions: SessionList = response
            .json()
            .await
            .map_err(|e| ServiceError::Payment(format!("unexpected session list payload: {e}")))?;

        Ok(sessions
            .data
            .first()
            .and_then(|session| PaymentMetadata::from_stripe(&session.metadata)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::CheckoutLineItem;
    use axum::{
        Form, Json, Router,
        extract::Query,
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use testresult::TestResult;
    use tokio::net::TcpListener;

    fn checkout_request() -> CheckoutSessionRequest {
        CheckoutSessionRequest {
            line_items: vec![
                CheckoutLineItem {
                    name: "Apple".into(),
                    unit_amount: 9_000,
                    quantity: 2,
                },
                CheckoutLineItem {
                    name: "Bread".into(),
                    unit_amount: 5_000,
                    quantity: 1,
                },
            ],
            success_url: "http://shop.test/loader?next=my-orders".into(),
            cancel_url: "http://shop.test/cart".into(),
            metadata: PaymentMetadata {
                order_id: 12,
                user_id: 3,
            },
        }
    }

    fn gateway(api_base: String) -> StripeGateway {
        StripeGateway::new(StripeConfig {
            secret_key: "sk_test_123".into(),
            currency: "usd".into(),
            api_base,
        })
    }

    async fn fake_stripe() -> TestResult<String> {
        let app = Router::new().route(
            "/v1/checkout/sessions",
            post(
                |headers: HeaderMap, Form(form): Form<HashMap<String, String>>| async move {
                    let authorized = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        == Some("Bearer sk_test_123");
                    if !authorized {
                        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "no key"})));
                    }
                    let url = format!(
                        "https://checkout.test/{}/{}",
                        form.get("metadata[orderId]").cloned().unwrap_or_default(),
                        form.get("line_items[1][price_data][unit_amount]")
                            .cloned()
                            .unwrap_or_default(),
                    );
                    (StatusCode::OK, Json(json!({"id": "cs_1", "url": url})))
                },
            )
            .get(|Query(query): Query<HashMap<String, String>>| async move {
                let data: Vec<Value> = if query.get("payment_intent").map(String::as_str)
                    == Some("pi_known")
                {
                    vec![json!({"id": "cs_1", "metadata": {"orderId": "12", "userId": "3"}})]
                } else {
                    Vec::new()
                };
                Json(json!({ "object": "list", "data": data }))
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(format!("http://{addr}"))
    }

    #[test]
    fn form_carries_lines_urls_and_metadata_twice() {
        let form = gateway("http://unused".into()).checkout_form(&checkout_request());
        let get = |key: &str| {
            form.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("mode"), Some("payment"));
        assert_eq!(get("success_url"), Some("http://shop.test/loader?next=my-orders"));
        assert_eq!(get("cancel_url"), Some("http://shop.test/cart"));
        assert_eq!(get("line_items[0][price_data][currency]"), Some("usd"));
        assert_eq!(get("line_items[0][price_data][product_data][name]"), Some("Apple"));
        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("9000"));
        assert_eq!(get("line_items[0][quantity]"), Some("2"));
        assert_eq!(get("line_items[1][quantity]"), Some("1"));
        assert_eq!(get("metadata[orderId]"), Some("12"));
        assert_eq!(get("metadata[userId]"), Some("3"));
        assert_eq!(get("payment_intent_data[metadata][orderId]"), Some("12"));
        assert_eq!(get("payment_intent_data[metadata][userId]"), Some("3"));
    }

    #[tokio::test]
    async fn creates_a_session_against_the_api() -> TestResult {
        let base = fake_stripe().await?;

        let session = gateway(base)
            .create_checkout_session(&checkout_request())
            .await?;

        assert_eq!(session.id, "cs_1");
        assert_eq!(session.url, "https://checkout.test/12/5000");
        Ok(())
    }

    #[tokio::test]
    async fn rejected_requests_become_payment_errors() -> TestResult {
        let base = fake_stripe().await?;
        let gateway = StripeGateway::new(StripeConfig {
            secret_key: "sk_wrong".into(),
            currency: "usd".into(),
            api_base: base,
        });

        let result = gateway.create_checkout_session(&checkout_request()).await;

        assert!(matches!(result, Err(ServiceError::Payment(_))));
        Ok(())
    }

    #[tokio::test]
    async fn looks_up_session_metadata_by_payment_intent() -> TestResult {
        let gateway = gateway(fake_stripe().await?);

        assert_eq!(
            gateway.find_session_metadata("pi_known").await?,
            Some(PaymentMetadata {
                order_id: 12,
                user_id: 3
            })
        );
        assert_eq!(gateway.find_session_metadata("pi_unknown").await?, None);
        Ok(())
    }
}
