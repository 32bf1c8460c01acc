//! # PhonePe Standard Checkout
//!
//! Order creation, status and refund against the PhonePe PG v2 API.
//! Every call authenticates with the cached `O-Bearer` token.

use crate::config::PhonePeConfig;
use crate::http::{send_json, PROVIDER};
use crate::token::TokenCache;
use crate::webhook;
use async_trait::async_trait;
use pay_core::{
    refund_reference, CallbackUrls, CreateOrder, NormalizedWebhook, Order, PaymentError,
    PaymentGateway, PaymentResult, RefundRequest, SharedClock, SystemClock, WebhookSignature,
};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// PhonePe gateway
pub struct PhonePeGateway {
    config: PhonePeConfig,
    client: Client,
    clock: SharedClock,
    tokens: TokenCache,
}

impl PhonePeGateway {
    /// Create a gateway with its own HTTP client and the system clock
    pub fn new(config: PhonePeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_parts(config, client, Arc::new(SystemClock)))
    }

    /// Create a gateway from explicit parts
    pub fn with_parts(config: PhonePeConfig, client: Client, clock: SharedClock) -> Self {
        let tokens = TokenCache::from_config(&config, client.clone(), clock.clone());
        Self {
            config,
            client,
            clock,
            tokens,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(PhonePeConfig::from_env()?)
    }

    pub fn config(&self) -> &PhonePeConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    fn build_pay_request(
        &self,
        order: &CreateOrder,
        amount: i64,
        urls: &CallbackUrls,
    ) -> PhonePePayRequest {
        let message = order
            .description
            .clone()
            .unwrap_or_else(|| format!("Payment for order {}", order.merchant_order_id));

        PhonePePayRequest {
            merchant_order_id: order.merchant_order_id.clone(),
            amount,
            expire_after: self.config.order_expiry_secs,
            meta_info: PhonePeMetaInfo {
                udf1: Some(order.customer.phone.clone()),
                udf2: order.customer.email.clone(),
                udf3: order.customer.name.clone(),
            },
            payment_flow: PhonePePaymentFlow {
                flow_type: "PG_CHECKOUT",
                message,
                merchant_urls: PhonePeMerchantUrls {
                    redirect_url: urls.redirect_url(
                        PROVIDER,
                        "orderId",
                        &order.merchant_order_id,
                    ),
                },
            },
        }
    }
}

/// Typed view over an order response, for logging
fn order_summary(body: &Value, merchant_order_id: &str, amount: i64) -> Order {
    Order {
        id: body.get("orderId").and_then(Value::as_str).map(String::from),
        merchant_order_id: merchant_order_id.to_string(),
        amount: body.get("amount").and_then(Value::as_i64).unwrap_or(amount),
        currency: Default::default(),
        status: body.get("state").and_then(Value::as_str).map(String::from),
    }
}

#[async_trait]
impl PaymentGateway for PhonePeGateway {
    #[instrument(skip(self, order, urls), fields(merchant_order_id = %order.merchant_order_id))]
    async fn create_order(&self, order: &CreateOrder, urls: &CallbackUrls) -> PaymentResult<Value> {
        let price = order.price()?;
        let payload = self.build_pay_request(order, price.amount, urls);
        debug!(
            "Creating PhonePe order: amount={} paise, redirect={}",
            payload.amount, payload.payment_flow.merchant_urls.redirect_url
        );

        let request = self
            .client
            .post(&self.config.endpoints.pay)
            .header("Authorization", self.tokens.authorization_header().await?)
            .json(&payload);
        let body = send_json(request, "pay").await?;

        let summary = order_summary(&body, &order.merchant_order_id, price.amount);
        info!(
            "Created PhonePe order: id={:?}, state={:?}",
            summary.id, summary.status
        );
        Ok(body)
    }

    #[instrument(skip(self))]
    async fn order_status(&self, order_id: &str) -> PaymentResult<Value> {
        let request = self
            .client
            .get(self.config.endpoints.status_url(order_id)?)
            .query(&[("details", "false")])
            .header("Authorization", self.tokens.authorization_header().await?);
        let body = send_json(request, "status").await?;

        debug!(
            "PhonePe order {} state={:?}",
            order_id,
            body.get("state").and_then(|v| v.as_str())
        );
        Ok(body)
    }

    #[instrument(skip(self, refund), fields(transaction_id = %refund.transaction_id))]
    async fn refund(&self, refund: &RefundRequest) -> PaymentResult<Value> {
        let price = refund.price()?;
        let payload = PhonePeRefundRequest {
            merchant_refund_id: refund_reference("RF", self.clock.as_ref()),
            original_merchant_order_id: refund.transaction_id.clone(),
            amount: price.amount,
        };

        let request = self
            .client
            .post(&self.config.endpoints.refund)
            .header("Authorization", self.tokens.authorization_header().await?)
            .json(&payload);
        let body = send_json(request, "refund").await?;

        info!(
            "Initiated PhonePe refund {}: state={:?}",
            payload.merchant_refund_id,
            body.get("state").and_then(|v| v.as_str())
        );
        Ok(body)
    }

    fn verify_webhook(&self, _payload: &[u8], signature: &WebhookSignature) -> PaymentResult<()> {
        let (username, password) = match (
            self.config.webhook_username.as_deref(),
            self.config.webhook_password.as_deref(),
        ) {
            (Some(u), Some(p)) => (u, p),
            _ => {
                return Err(PaymentError::Configuration(
                    "PhonePe webhook username/password not configured".to_string(),
                ))
            }
        };
        webhook::verify_authorization(username, password, signature.authorization.as_deref())
    }

    fn normalize_webhook(&self, payload: &Value) -> PaymentResult<NormalizedWebhook> {
        Ok(webhook::normalize(payload))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// PhonePe API Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhonePePayRequest {
    merchant_order_id: String,
    amount: i64,
    expire_after: u64,
    meta_info: PhonePeMetaInfo,
    payment_flow: PhonePePaymentFlow,
}

#[derive(Debug, Serialize)]
struct PhonePeMetaInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    udf1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    udf2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    udf3: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhonePePaymentFlow {
    #[serde(rename = "type")]
    flow_type: &'static str,
    message: String,
    merchant_urls: PhonePeMerchantUrls,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhonePeMerchantUrls {
    redirect_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhonePeRefundRequest {
    merchant_refund_id: String,
    original_merchant_order_id: String,
    amount: i64,
}
