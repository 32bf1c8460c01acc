//! # pay-api
//!
//! HTTP API layer for course-pay.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Order, status and refund endpoints for PhonePe and Cashfree
//! - Webhook verification and normalization
//! - Server-rendered course detail page
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/{gateway}/orders` | Create order |
//! | GET | `/api/v1/{gateway}/orders/{order_id}` | Order status |
//! | POST | `/api/v1/{gateway}/refunds` | Refund payment |
//! | GET | `/api/v1/courses` | List courses |
//! | GET | `/api/v1/courses/{course_id}` | Get course |
//! | GET | `/courses/detail?id=` | Course detail page |
//! | POST | `/webhook/{gateway}` | Gateway webhook |

pub mod handlers;
pub mod pages;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
