//! # Routes
//!
//! Axum router configuration for the payment API and course pages.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Gateways (`{gateway}` is `phonepe` or `cashfree`):
///   - POST /api/v1/{gateway}/orders - Create order
///   - GET  /api/v1/{gateway}/orders/{order_id} - Order status
///   - POST /api/v1/{gateway}/refunds - Refund a payment
///
/// - Courses:
///   - GET /api/v1/courses - List courses
///   - GET /api/v1/courses/{course_id} - Get course by ID
///   - GET /courses/detail?id= - Course detail page
///
/// - Webhooks:
///   - POST /webhook/{gateway} - Gateway notification
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Static course routes win over `/{gateway}` matches
    let api_routes = Router::new()
        .route("/courses", get(handlers::list_courses))
        .route("/courses/{course_id}", get(handlers::get_course))
        .route("/{gateway}/orders", post(handlers::create_order))
        .route("/{gateway}/orders/{order_id}", get(handlers::order_status))
        .route("/{gateway}/refunds", post(handlers::refund));

    // Raw body, verified by the gateway before parsing
    let webhook_routes = Router::new().route("/{gateway}", post(handlers::webhook));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .route("/courses/detail", get(handlers::course_detail))
        .nest("/api/v1", api_routes)
        .nest("/webhook", webhook_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
