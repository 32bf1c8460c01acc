//! # Payment Gateway Trait
//!
//! Strategy trait implemented by each vendor crate (PhonePe, Cashfree).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   PaymentGateway (trait)                    │
//! │  ├── create_order()                                         │
//! │  ├── order_status()                                         │
//! │  ├── refund()                                               │
//! │  ├── verify_webhook()                                       │
//! │  └── normalize_webhook()                                    │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                  ┌─────────┴─────────┐
//!          ┌───────┴───────┐   ┌───────┴───────┐
//!          │PhonePeGateway │   │CashfreeGateway│
//!          └───────────────┘   └───────────────┘
//! ```
//!
//! Vendor responses are returned as `serde_json::Value`, unmodified. The
//! request/response schemas belong to the vendors.

use crate::error::PaymentResult;
use crate::order::{CreateOrder, NormalizedWebhook, RefundRequest, WebhookSignature};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use url::form_urlencoded;

/// Core trait for payment gateway implementations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order and return the vendor response body.
    ///
    /// # Arguments
    /// * `order` - Order details (amount in major units)
    /// * `urls` - Base URLs used to derive redirect and notify callbacks
    async fn create_order(
        &self,
        order: &CreateOrder,
        urls: &CallbackUrls,
    ) -> PaymentResult<serde_json::Value>;

    /// Fetch the vendor's current view of an order.
    async fn order_status(&self, order_id: &str) -> PaymentResult<serde_json::Value>;

    /// Refund a payment. A unique refund reference is generated per call.
    async fn refund(&self, refund: &RefundRequest) -> PaymentResult<serde_json::Value>;

    /// Authenticate an inbound webhook against its raw body.
    fn verify_webhook(&self, payload: &[u8], signature: &WebhookSignature) -> PaymentResult<()>;

    /// Reshape a vendor webhook payload into the fixed normalized form.
    fn normalize_webhook(&self, payload: &serde_json::Value) -> PaymentResult<NormalizedWebhook>;

    /// Get the provider name (for logging and routing).
    fn provider_name(&self) -> &'static str;

    /// Get the webhook endpoint path for this provider.
    /// Default: `/webhook/{provider_name}`
    fn webhook_path(&self) -> String {
        format!("/webhook/{}", self.provider_name())
    }
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;

/// Registry of configured gateways, keyed by provider name
#[derive(Clone, Default)]
pub struct GatewaySelector {
    gateways: HashMap<String, BoxedPaymentGateway>,
}

impl GatewaySelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a gateway
    pub fn register(&mut self, gateway: BoxedPaymentGateway) {
        let name = gateway.provider_name().to_string();
        if self.gateways.insert(name.clone(), gateway).is_some() {
            warn!("Replaced payment gateway: {}", name);
        } else {
            debug!("Registered payment gateway: {}", name);
        }
    }

    /// Register with builder pattern
    pub fn with_gateway(mut self, gateway: BoxedPaymentGateway) -> Self {
        self.register(gateway);
        self
    }

    /// Get a gateway by provider name
    pub fn get(&self, provider: &str) -> Option<&BoxedPaymentGateway> {
        self.gateways.get(provider)
    }

    /// List all registered providers, sorted
    pub fn providers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.gateways.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn has_provider(&self, provider: &str) -> bool {
        self.gateways.contains_key(provider)
    }
}

/// Base URLs used to build gateway callbacks
#[derive(Debug, Clone)]
pub struct CallbackUrls {
    /// Where the buyer's browser lands after paying (e.g., "https://learn.example.com")
    pub frontend_url: String,
    /// Where vendors deliver server-to-server notifications
    pub backend_url: String,
    /// Payment status page path on the frontend
    pub status_path: String,
}

impl CallbackUrls {
    pub fn new(frontend_url: impl Into<String>, backend_url: impl Into<String>) -> Self {
        Self {
            frontend_url: trim_slash(frontend_url.into()),
            backend_url: trim_slash(backend_url.into()),
            status_path: "/payment/status".to_string(),
        }
    }

    /// Frontend redirect for a finished payment.
    /// `id_param` is the query key the vendor's flow expects.
    /// Query values are form-urlencoded.
    pub fn redirect_url(&self, provider: &str, id_param: &str, order_id: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("gateway", provider)
            .append_pair(id_param, order_id)
            .finish();
        format!("{}{}?{}", self.frontend_url, self.status_path, query)
    }

    /// Backend webhook endpoint for a provider
    pub fn notify_url(&self, provider: &str) -> String {
        format!("{}/webhook/{}", self.backend_url, provider)
    }
}

impl Default for CallbackUrls {
    fn default() -> Self {
        Self::new("http://localhost:3000", "http://localhost:8080")
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
