//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the configured gateways, callback URLs and the course catalog.

use pay_cashfree::{CashfreeConfig, CashfreeGateway};
use pay_core::{
    BoxedPaymentGateway, CallbackUrls, CourseCatalog, GatewaySelector, SharedClock, SystemClock,
};
use pay_phonepe::{PhonePeConfig, PhonePeGateway};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Frontend base URL (buyer redirects)
    pub frontend_url: String,
    /// Backend base URL (vendor notifications)
    pub backend_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Course catalog JSON
    pub courses_path: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let var = |name: &str, default: &str| {
            std::env::var(name).unwrap_or_else(|_| default.to_string())
        };

        Self {
            host: var("HOST", "127.0.0.1"),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            frontend_url: var("FRONTEND_URL", "http://localhost:3000"),
            backend_url: var("BACKEND_URL", "http://localhost:8080"),
            environment: var("ENVIRONMENT", "development"),
            courses_path: var("COURSES_PATH", "config/courses.json"),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e)
            })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn callback_urls(&self) -> CallbackUrls {
        CallbackUrls::new(&self.frontend_url, &self.backend_url)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Registered payment gateways
    pub gateways: GatewaySelector,
    /// Course catalog
    pub catalog: Arc<CourseCatalog>,
    /// Callback URL builder
    pub urls: CallbackUrls,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Build state from the environment.
    ///
    /// A gateway whose credentials are missing is skipped with a warning.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let catalog = load_course_catalog(&config.courses_path);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let clock: SharedClock = Arc::new(SystemClock);

        let mut gateways = GatewaySelector::new();

        match PhonePeConfig::from_env() {
            Ok(phonepe) => {
                info!("PhonePe configured ({})", phonepe.environment);
                let gateway = PhonePeGateway::with_parts(phonepe, client.clone(), clock.clone());
                gateways.register(Arc::new(gateway) as BoxedPaymentGateway);
            }
            Err(e) => warn!("PhonePe disabled: {}", e),
        }

        match CashfreeConfig::from_env() {
            Ok(cashfree) => {
                info!("Cashfree configured ({})", cashfree.environment);
                let gateway = CashfreeGateway::with_parts(cashfree, client, clock);
                gateways.register(Arc::new(gateway) as BoxedPaymentGateway);
            }
            Err(e) => warn!("Cashfree disabled: {}", e),
        }

        Ok(Self::from_parts(config, gateways, catalog))
    }

    /// Assemble state from explicit parts
    pub fn from_parts(
        config: AppConfig,
        gateways: GatewaySelector,
        catalog: CourseCatalog,
    ) -> Self {
        Self {
            urls: config.callback_urls(),
            gateways,
            catalog: Arc::new(catalog),
            config,
        }
    }

    /// Get a specific gateway
    pub fn gateway(&self, provider: &str) -> Option<&BoxedPaymentGateway> {
        self.gateways.get(provider)
    }
}

/// Load the course catalog, falling back to an empty one
fn load_course_catalog(path: &str) -> CourseCatalog {
    match CourseCatalog::load(path) {
        Ok(catalog) => {
            info!("Loaded {} courses from {}", catalog.len(), path);
            catalog
        }
        Err(e) => {
            warn!("No course catalog loaded ({}), using empty catalog", e);
            CourseCatalog::new()
        }
    }
}
