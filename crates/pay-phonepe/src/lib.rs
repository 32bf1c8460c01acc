//! # pay-phonepe
//!
//! PhonePe Standard Checkout (PG v2) gateway for course-pay.
//!
//! - **TokenCache** - OAuth client-credentials token, cached until 60s
//!   before expiry
//! - **PhonePeGateway** - order creation, status and refund, plus webhook
//!   authorization and normalization
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_phonepe::PhonePeGateway;
//! use pay_core::{CallbackUrls, CreateOrder, Customer, PaymentGateway};
//!
//! let gateway = PhonePeGateway::from_env()?;
//!
//! let order = CreateOrder::new("ORD1", 500.0, Customer::new("9999999999"));
//! let response = gateway.create_order(&order, &urls).await?;
//!
//! // Send the buyer to response["redirectUrl"]
//! ```

pub mod config;
pub mod gateway;
mod http;
pub mod token;
pub mod webhook;

// Re-exports
pub use config::{EndpointSet, PhonePeConfig};
pub use gateway::PhonePeGateway;
pub use token::{normalize_expiry_millis, CachedToken, OAuthCredentials, TokenCache};
