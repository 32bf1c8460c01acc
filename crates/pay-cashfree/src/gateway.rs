//! # Cashfree Orders
//!
//! Order creation, status and refund against the Cashfree PG API.
//! Requests carry the app id / secret key headers directly; there is no
//! token exchange.

use crate::config::CashfreeConfig;
use crate::webhook;
use async_trait::async_trait;
use pay_core::{
    refund_reference, CallbackUrls, Clock, CreateOrder, NormalizedWebhook, Order, PaymentError,
    PaymentGateway, PaymentResult, RefundRequest, SharedClock, SystemClock, WebhookSignature,
};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

pub(crate) const PROVIDER: &str = "cashfree";

/// Cashfree gateway
pub struct CashfreeGateway {
    config: CashfreeConfig,
    client: Client,
    clock: SharedClock,
}

impl CashfreeGateway {
    /// Create a gateway with its own HTTP client and the system clock
    pub fn new(config: CashfreeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_parts(config, client, Arc::new(SystemClock)))
    }

    /// Create a gateway from explicit parts
    pub fn with_parts(config: CashfreeConfig, client: Client, clock: SharedClock) -> Self {
        Self {
            config,
            client,
            clock,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(CashfreeConfig::from_env()?)
    }

    pub fn config(&self) -> &CashfreeConfig {
        &self.config
    }

    /// Attach the API-key headers
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("x-client-id", &self.config.app_id)
            .header("x-client-secret", &self.config.secret_key)
            .header("x-api-version", &self.config.api_version)
            .header("Accept", "application/json")
    }

    async fn send(&self, request: RequestBuilder, operation: &str) -> PaymentResult<Value> {
        let response = self.authorize(request).send().await.map_err(|e| {
            error!("Cashfree {} request failed: {}", operation, e);
            PaymentError::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        if !status.is_success() {
            error!(
                "Cashfree {} error: status={}, body={}",
                operation, status, body
            );

            let message = serde_json::from_str::<CashfreeErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("HTTP {}: {}", status, body));
            return Err(PaymentError::gateway(PROVIDER, status.as_u16(), message));
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!(
                "Failed to parse Cashfree {} response: {}",
                operation, e
            ))
        })
    }

    fn build_order_request(
        &self,
        order: &CreateOrder,
        amount: i64,
        urls: &CallbackUrls,
    ) -> CashfreeOrderRequest {
        let customer = &order.customer;
        CashfreeOrderRequest {
            order_id: order.merchant_order_id.clone(),
            order_amount: order.currency.from_minor_units(amount),
            order_currency: order.currency.as_str().to_string(),
            customer_details: CashfreeCustomerDetails {
                customer_id: customer.id_or_derived(),
                customer_name: customer.name.clone(),
                customer_email: customer.email.clone(),
                customer_phone: customer.phone.clone(),
            },
            order_meta: CashfreeOrderMeta {
                return_url: urls.redirect_url(PROVIDER, "order_id", &order.merchant_order_id),
                notify_url: urls.notify_url(PROVIDER),
            },
            order_note: order.description.clone(),
        }
    }
}

/// Typed view over an order response, for logging
fn order_summary(body: &Value, order: &CreateOrder, amount: i64) -> Order {
    Order {
        id: body.get("cf_order_id").map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
        merchant_order_id: order.merchant_order_id.clone(),
        amount,
        currency: order.currency,
        status: body
            .get("order_status")
            .and_then(Value::as_str)
            .map(String::from),
    }
}

#[async_trait]
impl PaymentGateway for CashfreeGateway {
    #[instrument(skip(self, order, urls), fields(order_id = %order.merchant_order_id))]
    async fn create_order(&self, order: &CreateOrder, urls: &CallbackUrls) -> PaymentResult<Value> {
        let price = order.price()?;
        let payload = self.build_order_request(order, price.amount, urls);
        debug!(
            "Creating Cashfree order: amount={} {}, return_url={}",
            payload.order_amount, payload.order_currency, payload.order_meta.return_url
        );

        let request = self.client.post(self.config.orders_url()).json(&payload);
        let body = self.send(request, "create order").await?;

        let summary = order_summary(&body, order, price.amount);
        info!(
            "Created Cashfree order: cf_order_id={:?}, status={:?}",
            summary.id, summary.status
        );
        Ok(body)
    }

    #[instrument(skip(self))]
    async fn order_status(&self, order_id: &str) -> PaymentResult<Value> {
        let request = self.client.get(self.config.order_url(order_id)?);
        let body = self.send(request, "order status").await?;

        debug!(
            "Cashfree order {} status={:?}",
            order_id,
            body.get("order_status").and_then(|v| v.as_str())
        );
        Ok(body)
    }

    #[instrument(skip(self, refund), fields(payment_id = %refund.transaction_id))]
    async fn refund(&self, refund: &RefundRequest) -> PaymentResult<Value> {
        let price = refund.price()?;
        let order_id = refund.order_id.as_deref().ok_or_else(|| {
            PaymentError::InvalidRequest("Cashfree refunds require order_id".to_string())
        })?;

        let payload = CashfreeRefundRequest {
            refund_id: refund_reference("refund", self.clock.as_ref()),
            refund_amount: price.as_decimal(),
            refund_note: refund
                .note
                .clone()
                .or_else(|| Some(format!("Refund for payment {}", refund.transaction_id))),
        };

        let request = self
            .client
            .post(self.config.refunds_url(order_id)?)
            .json(&payload);
        let body = self.send(request, "refund").await?;

        info!(
            "Initiated Cashfree refund {} on order {}: status={:?}",
            payload.refund_id,
            order_id,
            body.get("refund_status").and_then(|v| v.as_str())
        );
        Ok(body)
    }

    fn verify_webhook(&self, payload: &[u8], signature: &WebhookSignature) -> PaymentResult<()> {
        webhook::verify_signature(
            &self.config.secret_key,
            signature.timestamp.as_deref(),
            payload,
            signature.signature.as_deref(),
        )?;
        // Present and signed once verify_signature passes
        let timestamp = signature.timestamp.as_deref().unwrap_or_default();
        webhook::check_timestamp(
            timestamp,
            self.clock.now_millis(),
            self.config.webhook_tolerance_secs,
        )
    }

    fn normalize_webhook(&self, payload: &Value) -> PaymentResult<NormalizedWebhook> {
        webhook::normalize(payload)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Cashfree API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CashfreeOrderRequest {
    order_id: String,
    /// Major units
    order_amount: f64,
    order_currency: String,
    customer_details: CashfreeCustomerDetails,
    order_meta: CashfreeOrderMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_note: Option<String>,
}

#[derive(Debug, Serialize)]
struct CashfreeCustomerDetails {
    customer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_email: Option<String>,
    customer_phone: String,
}

#[derive(Debug, Serialize)]
struct CashfreeOrderMeta {
    return_url: String,
    notify_url: String,
}

#[derive(Debug, Serialize)]
struct CashfreeRefundRequest {
    refund_id: String,
    refund_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    refund_note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CashfreeErrorResponse {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pay_core::{Customer, ManualClock};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const NOW: i64 = 1_700_000_000_000;

    fn gateway_for(server: &MockServer) -> CashfreeGateway {
        let config = CashfreeConfig::new("TEST_APP", "cf-secret").with_api_base_url(server.uri());
        CashfreeGateway::with_parts(config, Client::new(), Arc::new(ManualClock::new(NOW)))
    }

    fn urls() -> CallbackUrls {
        CallbackUrls::new("https://learn.example.com", "https://api.example.com")
    }

    #[tokio::test]
    async fn test_create_order() {
        let server = MockServer::start().await;
        let gateway = gateway_for(&server);

        let vendor_response = json!({
            "cf_order_id": 2149460581i64,
            "order_id": "ORD1",
            "order_amount": 500.0,
            "order_currency": "INR",
            "order_status": "ACTIVE",
            "payment_session_id": "session_a1b2c3"
        });

        Mock::given(method("POST"))
            .and(path("/orders"))
            .and(header("x-client-id", "TEST_APP"))
            .and(header("x-client-secret", "cf-secret"))
            .and(header("x-api-version", "2023-08-01"))
            .and(body_partial_json(json!({
                "order_id": "ORD1",
                "order_amount": 500.0,
                "order_currency": "INR",
                "customer_details": {
                    "customer_id": "cust_9999999999",
                    "customer_phone": "9999999999"
                },
                "order_meta": {
                    "return_url": "https://learn.example.com/payment/status?gateway=cashfree&order_id=ORD1",
                    "notify_url": "https://api.example.com/webhook/cashfree"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(vendor_response.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let order = CreateOrder::new("ORD1", 500.0, Customer::new("9999999999"));
        let body = gateway.create_order(&order, &urls()).await.unwrap();
        assert_eq!(body, vendor_response);
    }

    #[tokio::test]
    async fn test_create_order_rounds_through_minor_units() {
        let server = MockServer::start().await;
        let gateway = gateway_for(&server);

        Mock::given(method("POST"))
            .and(path("/orders"))
            .and(body_partial_json(json!({ "order_amount": 199.0 })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"order_status": "ACTIVE"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let order = CreateOrder::new("ORD2", 199.004, Customer::new("1"));
        gateway.create_order(&order, &urls()).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_order_vendor_error() {
        let server = MockServer::start().await;
        let gateway = gateway_for(&server);

        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "message": "order with same id is already present",
                "code": "order_already_exists",
                "type": "invalid_request_error"
            })))
            .mount(&server)
            .await;

        let order = CreateOrder::new("ORD1", 500.0, Customer::new("1"));
        match gateway.create_order(&order, &urls()).await {
            Err(PaymentError::Gateway {
                provider,
                status,
                message,
            }) => {
                assert_eq!(provider, "cashfree");
                assert_eq!(status, 409);
                assert_eq!(message, "order with same id is already present");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let server = MockServer::start().await;
        let gateway = gateway_for(&server);

        Mock::given(method("GET"))
            .and(path("/orders/ORD1"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        match gateway.order_status("ORD1").await {
            Err(PaymentError::Gateway { status, message, .. }) => {
                assert_eq!(status, 502);
                assert!(message.contains("Bad Gateway"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_order_status() {
        let server = MockServer::start().await;
        let gateway = gateway_for(&server);

        Mock::given(method("GET"))
            .and(path("/orders/ORD1"))
            .and(header("x-client-id", "TEST_APP"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "order_id": "ORD1",
                "order_status": "PAID",
                "order_amount": 500.0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let body = gateway.order_status("ORD1").await.unwrap();
        assert_eq!(body["order_status"], "PAID");
    }

    #[tokio::test]
    async fn test_order_status_escapes_order_id() {
        let server = MockServer::start().await;
        let gateway = gateway_for(&server);

        Mock::given(method("GET"))
            .and(path("/orders/ORD1/refunds"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "order not found"
            })))
            .mount(&server)
            .await;

        let err = gateway.order_status("ORD1/refunds").await.unwrap_err();
        assert_eq!(err.gateway_status(), Some(404));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.path(), "/orders/ORD1%2Frefunds");

        // Dot segments never leave the process
        assert!(matches!(
            gateway.order_status("..").await,
            Err(PaymentError::InvalidRequest(_))
        ));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_refund() {
        let server = MockServer::start().await;
        let gateway = gateway_for(&server);

        Mock::given(method("POST"))
            .and(path("/orders/ORD1/refunds"))
            .and(body_partial_json(json!({ "refund_amount": 250.0 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cf_refund_id": "11325632",
                "refund_status": "PENDING"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let refund = RefundRequest::new("885123456", 250.0).for_order("ORD1");
        let body = gateway.refund(&refund).await.unwrap();
        assert_eq!(body["refund_status"], "PENDING");

        let requests = server.received_requests().await.unwrap();
        let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(sent["refund_id"]
            .as_str()
            .unwrap()
            .starts_with("refund_1700000000000_"));
    }

    #[tokio::test]
    async fn test_refund_requires_order_id() {
        let server = MockServer::start().await;
        let gateway = gateway_for(&server);

        let result = gateway.refund(&RefundRequest::new("885123456", 250.0)).await;
        assert!(matches!(result, Err(PaymentError::InvalidRequest(_))));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
