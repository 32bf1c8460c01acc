//! # course-pay
//!
//! Payment backend for the course storefront.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export PHONEPE_CLIENT_ID=...
//! export PHONEPE_CLIENT_SECRET=...
//! export CASHFREE_APP_ID=...
//! export CASHFREE_SECRET_KEY=...
//!
//! # Run the server
//! course-pay
//! ```

use pay_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Courses loaded: {}", state.catalog.len());
    info!("Payment gateways: {:?}", state.gateways.providers());

    info!("course-pay starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Orders: POST http://{}/api/v1/{{gateway}}/orders", addr);
        info!("Courses: http://{}/courses/detail?id=1", addr);
        for provider in state.gateways.providers() {
            if let Some(gateway) = state.gateways.get(provider) {
                info!("Webhook: POST http://{}{}", addr, gateway.webhook_path());
            }
        }
    }

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  course-pay
  ━━━━━━━━━━━━━━━━━━━━━━━
  PhonePe + Cashfree checkout
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
