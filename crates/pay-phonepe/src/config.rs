//! # PhonePe Configuration
//!
//! Credentials and the endpoint set, resolved once at construction.
//! Secrets are loaded from environment variables.

use pay_core::{vendor_url, GatewayEnvironment, PaymentError, PaymentResult};
use std::env;

pub const SANDBOX_BASE_URL: &str = "https://api-preprod.phonepe.com/apis/pg-sandbox";
pub const PRODUCTION_OAUTH_URL: &str =
    "https://api.phonepe.com/apis/identity-manager/v1/oauth/token";
pub const PRODUCTION_PG_BASE_URL: &str = "https://api.phonepe.com/apis/pg";

/// Order validity sent as `expireAfter` (seconds)
pub const DEFAULT_ORDER_EXPIRY_SECS: u64 = 1200;

/// Fully resolved PhonePe endpoint URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSet {
    /// OAuth client-credentials token endpoint
    pub oauth: String,
    /// Order creation (`/checkout/v2/pay`)
    pub pay: String,
    /// Order status prefix; `/{merchantOrderId}/status` is appended
    pub status: String,
    /// Refund initiation
    pub refund: String,
}

impl EndpointSet {
    pub fn for_environment(environment: GatewayEnvironment) -> Self {
        match environment {
            GatewayEnvironment::Sandbox => Self::with_base(SANDBOX_BASE_URL),
            GatewayEnvironment::Production => Self {
                oauth: PRODUCTION_OAUTH_URL.to_string(),
                ..Self::pg_routes(PRODUCTION_PG_BASE_URL)
            },
        }
    }

    /// All endpoints under one base URL (sandbox layout, or a mock server)
    pub fn with_base(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            oauth: format!("{}/v1/oauth/token", base),
            ..Self::pg_routes(base)
        }
    }

    fn pg_routes(base: &str) -> Self {
        Self {
            oauth: String::new(),
            pay: format!("{}/checkout/v2/pay", base),
            status: format!("{}/checkout/v2/order", base),
            refund: format!("{}/payments/v2/refund", base),
        }
    }

    pub fn status_url(&self, merchant_order_id: &str) -> PaymentResult<String> {
        vendor_url(&self.status, &[merchant_order_id, "status"])
    }
}

/// PhonePe API configuration
#[derive(Debug, Clone)]
pub struct PhonePeConfig {
    pub client_id: String,
    pub client_secret: String,
    pub client_version: String,
    pub environment: GatewayEnvironment,
    pub endpoints: EndpointSet,
    /// Credentials PhonePe hashes into the webhook `Authorization` header
    pub webhook_username: Option<String>,
    pub webhook_password: Option<String>,
    pub order_expiry_secs: u64,
}

impl PhonePeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `PHONEPE_CLIENT_ID`
    /// - `PHONEPE_CLIENT_SECRET`
    ///
    /// Optional: `PHONEPE_CLIENT_VERSION` (default `1`), `PHONEPE_ENV`
    /// (default sandbox), `PHONEPE_WEBHOOK_USERNAME`, `PHONEPE_WEBHOOK_PASSWORD`.
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok();

        let client_id = required("PHONEPE_CLIENT_ID")?;
        let client_secret = required("PHONEPE_CLIENT_SECRET")?;
        let client_version =
            env::var("PHONEPE_CLIENT_VERSION").unwrap_or_else(|_| "1".to_string());

        let environment = match env::var("PHONEPE_ENV") {
            Ok(value) => value.parse()?,
            Err(_) => GatewayEnvironment::Sandbox,
        };

        let mut config = Self::new(client_id, client_secret, client_version)
            .with_environment(environment);
        config.webhook_username = env::var("PHONEPE_WEBHOOK_USERNAME").ok();
        config.webhook_password = env::var("PHONEPE_WEBHOOK_PASSWORD").ok();
        Ok(config)
    }

    /// Create config with explicit values (sandbox endpoints)
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        client_version: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            client_version: client_version.into(),
            environment: GatewayEnvironment::Sandbox,
            endpoints: EndpointSet::for_environment(GatewayEnvironment::Sandbox),
            webhook_username: None,
            webhook_password: None,
            order_expiry_secs: DEFAULT_ORDER_EXPIRY_SECS,
        }
    }

    /// Builder: switch environment (and its endpoint set)
    pub fn with_environment(mut self, environment: GatewayEnvironment) -> Self {
        self.environment = environment;
        self.endpoints = EndpointSet::for_environment(environment);
        self
    }

    /// Builder: override endpoints (for testing/mocking)
    pub fn with_endpoints(mut self, endpoints: EndpointSet) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Builder: webhook credentials
    pub fn with_webhook_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.webhook_username = Some(username.into());
        self.webhook_password = Some(password.into());
        self
    }
}

fn required(name: &str) -> Result<String, PaymentError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PaymentError::Configuration(format!("{} not set", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_endpoints() {
        let endpoints = EndpointSet::for_environment(GatewayEnvironment::Sandbox);
        assert_eq!(
            endpoints.oauth,
            "https://api-preprod.phonepe.com/apis/pg-sandbox/v1/oauth/token"
        );
        assert_eq!(
            endpoints.pay,
            "https://api-preprod.phonepe.com/apis/pg-sandbox/checkout/v2/pay"
        );
        assert_eq!(
            endpoints.status_url("ORD1").unwrap(),
            "https://api-preprod.phonepe.com/apis/pg-sandbox/checkout/v2/order/ORD1/status"
        );
    }

    #[test]
    fn test_status_url_keeps_order_id_in_one_segment() {
        let endpoints = EndpointSet::with_base("http://127.0.0.1:7000");
        assert_eq!(
            endpoints.status_url("ORD1/../refund").unwrap(),
            "http://127.0.0.1:7000/checkout/v2/order/ORD1%2F..%2Frefund/status"
        );
        assert!(endpoints.status_url("..").is_err());
    }

    #[test]
    fn test_production_endpoints() {
        let endpoints = EndpointSet::for_environment(GatewayEnvironment::Production);
        assert_eq!(endpoints.oauth, PRODUCTION_OAUTH_URL);
        assert_eq!(endpoints.pay, "https://api.phonepe.com/apis/pg/checkout/v2/pay");
        assert_eq!(
            endpoints.refund,
            "https://api.phonepe.com/apis/pg/payments/v2/refund"
        );
    }

    #[test]
    fn test_with_environment_switches_endpoints() {
        let config = PhonePeConfig::new("id", "secret", "1")
            .with_environment(GatewayEnvironment::Production);
        assert!(config.environment.is_production());
        assert_eq!(config.endpoints.oauth, PRODUCTION_OAUTH_URL);
    }

    #[test]
    fn test_with_base_trims_slash() {
        let endpoints = EndpointSet::with_base("http://127.0.0.1:9000/");
        assert_eq!(endpoints.oauth, "http://127.0.0.1:9000/v1/oauth/token");
        assert_eq!(endpoints.refund, "http://127.0.0.1:9000/payments/v2/refund");
    }
}
