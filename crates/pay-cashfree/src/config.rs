//! # Cashfree Configuration
//!
//! All secrets are loaded from environment variables.

use pay_core::{vendor_url, GatewayEnvironment, PaymentError, PaymentResult};
use std::env;

pub const SANDBOX_BASE_URL: &str = "https://sandbox.cashfree.com/pg";
pub const PRODUCTION_BASE_URL: &str = "https://api.cashfree.com/pg";
pub const DEFAULT_API_VERSION: &str = "2023-08-01";
/// Accepted webhook timestamp skew, either direction
pub const DEFAULT_WEBHOOK_TOLERANCE_SECS: u64 = 300;

/// Cashfree API configuration
#[derive(Debug, Clone)]
pub struct CashfreeConfig {
    /// App id (`x-client-id`)
    pub app_id: String,

    /// Secret key (`x-client-secret`); also signs webhooks
    pub secret_key: String,

    /// `x-api-version` header
    pub api_version: String,

    pub environment: GatewayEnvironment,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Max age of `x-webhook-timestamp`; `0` disables the check
    pub webhook_tolerance_secs: u64,
}

impl CashfreeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `CASHFREE_APP_ID`
    /// - `CASHFREE_SECRET_KEY`
    ///
    /// Optional: `CASHFREE_ENV` (default sandbox), `CASHFREE_API_VERSION`,
    /// `CASHFREE_WEBHOOK_TOLERANCE_SECS` (default 300).
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok();

        let app_id = env::var("CASHFREE_APP_ID")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| PaymentError::Configuration("CASHFREE_APP_ID not set".to_string()))?;

        let secret_key = env::var("CASHFREE_SECRET_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                PaymentError::Configuration("CASHFREE_SECRET_KEY not set".to_string())
            })?;

        let environment = match env::var("CASHFREE_ENV") {
            Ok(value) => value.parse()?,
            Err(_) => GatewayEnvironment::Sandbox,
        };

        let mut config = Self::new(app_id, secret_key).with_environment(environment);
        if let Ok(version) = env::var("CASHFREE_API_VERSION") {
            config.api_version = version;
        }
        if let Ok(value) = env::var("CASHFREE_WEBHOOK_TOLERANCE_SECS") {
            config.webhook_tolerance_secs = value.trim().parse().map_err(|_| {
                PaymentError::Configuration(format!(
                    "CASHFREE_WEBHOOK_TOLERANCE_SECS must be a number of seconds, got {}",
                    value
                ))
            })?;
        }
        Ok(config)
    }

    /// Create config with explicit values (sandbox)
    pub fn new(app_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            secret_key: secret_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            environment: GatewayEnvironment::Sandbox,
            api_base_url: SANDBOX_BASE_URL.to_string(),
            webhook_tolerance_secs: DEFAULT_WEBHOOK_TOLERANCE_SECS,
        }
    }

    /// Builder: switch environment (and base URL)
    pub fn with_environment(mut self, environment: GatewayEnvironment) -> Self {
        self.environment = environment;
        self.api_base_url = match environment {
            GatewayEnvironment::Sandbox => SANDBOX_BASE_URL,
            GatewayEnvironment::Production => PRODUCTION_BASE_URL,
        }
        .to_string();
        self
    }

    /// Builder: webhook timestamp tolerance (`0` disables)
    pub fn with_webhook_tolerance_secs(mut self, secs: u64) -> Self {
        self.webhook_tolerance_secs = secs;
        self
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn orders_url(&self) -> String {
        format!("{}/orders", self.api_base_url)
    }

    pub fn order_url(&self, order_id: &str) -> PaymentResult<String> {
        vendor_url(&self.api_base_url, &["orders", order_id])
    }

    pub fn refunds_url(&self, order_id: &str) -> PaymentResult<String> {
        vendor_url(&self.api_base_url, &["orders", order_id, "refunds"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_base_urls() {
        let config = CashfreeConfig::new("app", "secret");
        assert_eq!(config.orders_url(), "https://sandbox.cashfree.com/pg/orders");

        let config = config.with_environment(GatewayEnvironment::Production);
        assert_eq!(
            config.order_url("ORD1").unwrap(),
            "https://api.cashfree.com/pg/orders/ORD1"
        );
        assert_eq!(
            config.refunds_url("ORD1").unwrap(),
            "https://api.cashfree.com/pg/orders/ORD1/refunds"
        );
    }

    #[test]
    fn test_custom_base_url() {
        let config =
            CashfreeConfig::new("app", "secret").with_api_base_url("http://127.0.0.1:7000/");
        assert_eq!(config.orders_url(), "http://127.0.0.1:7000/orders");
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
    }
}
