//! # pay-core
//!
//! Core types and traits shared by the course-pay gateway wrappers.
//!
//! This crate provides:
//! - `PaymentGateway` trait implemented by each vendor crate
//! - `CreateOrder`, `RefundRequest` and `NormalizedWebhook` for gateway calls
//! - `Currency` and `Price` for minor-unit amounts
//! - `Clock` for injectable time
//! - `CourseCatalog` for the static course listing
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{CallbackUrls, CreateOrder, Customer, PaymentGateway};
//!
//! let order = CreateOrder::new("ORD1", 500.0, Customer::new("9999999999"));
//! let urls = CallbackUrls::new("https://learn.example.com", "https://api.example.com");
//!
//! let response = gateway.create_order(&order, &urls).await?;
//! // Redirect the buyer using the vendor's response (e.g. `redirectUrl`)
//! ```

pub mod clock;
pub mod course;
pub mod endpoint;
pub mod environment;
pub mod error;
pub mod money;
pub mod order;
pub mod strategy;

// Re-exports for convenience
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use course::{Course, CourseCatalog};
pub use endpoint::vendor_url;
pub use environment::GatewayEnvironment;
pub use error::{PaymentError, PaymentResult};
pub use money::{Currency, Price};
pub use order::{
    constant_time_eq, refund_reference, CreateOrder, Customer, NormalizedWebhook, Order,
    RefundRequest, WebhookSignature,
};
pub use strategy::{BoxedPaymentGateway, CallbackUrls, GatewaySelector, PaymentGateway};
