//! # pay-cashfree
//!
//! Cashfree PG gateway for course-pay.
//!
//! Orders are created with `POST /orders`; the response carries the
//! `payment_session_id` the frontend hands to the Cashfree JS SDK.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_cashfree::CashfreeGateway;
//! use pay_core::{CreateOrder, Customer, PaymentGateway, RefundRequest};
//!
//! let gateway = CashfreeGateway::from_env()?;
//!
//! let order = CreateOrder::new("ORD1", 500.0, Customer::new("9999999999"));
//! let response = gateway.create_order(&order, &urls).await?;
//!
//! // Refunds are scoped to the owning order
//! gateway.refund(&RefundRequest::new("885123456", 500.0).for_order("ORD1")).await?;
//! ```

pub mod config;
pub mod gateway;
pub mod webhook;

// Re-exports
pub use config::CashfreeConfig;
pub use gateway::CashfreeGateway;
