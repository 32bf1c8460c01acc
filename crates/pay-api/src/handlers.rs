//! # Request Handlers
//!
//! Axum request handlers for the payment API and the course pages.
//! Gateway routes take the provider name from the path (`phonepe`, `cashfree`).

use crate::pages;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use pay_core::{
    BoxedPaymentGateway, CreateOrder, NormalizedWebhook, PaymentError, RefundRequest,
    WebhookSignature,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn payment_error_to_response(err: PaymentError) -> ApiError {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);
    if let Some(vendor_status) = err.gateway_status() {
        response =
            response.with_details(format!("gateway responded with HTTP {}", vendor_status));
    }
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn lookup_gateway<'a>(
    state: &'a AppState,
    provider: &str,
) -> Result<&'a BoxedPaymentGateway, ApiError> {
    state.gateway(provider).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                format!("Unknown payment gateway: {}", provider),
                404,
            )),
        )
    })
}

/// Collect the vendor authentication headers
fn webhook_signature(headers: &HeaderMap) -> WebhookSignature {
    let get = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    WebhookSignature {
        authorization: get("authorization"),
        signature: get("x-webhook-signature"),
        timestamp: get("x-webhook-timestamp"),
    }
}

/// `?id=` query for the course detail page
#[derive(Debug, Deserialize)]
pub struct CourseQuery {
    #[serde(default)]
    pub id: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "course-pay",
        "version": env!("CARGO_PKG_VERSION"),
        "gateways": state.gateways.providers(),
    }))
}

/// Create an order with a gateway; the vendor response is returned as-is
#[instrument(
    skip(state, request),
    fields(gateway = %provider, merchant_order_id = %request.merchant_order_id)
)]
pub async fn create_order(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(request): Json<CreateOrder>,
) -> Result<Json<Value>, ApiError> {
    let gateway = lookup_gateway(&state, &provider)?;

    let body = gateway
        .create_order(&request, &state.urls)
        .await
        .map_err(|e| {
            error!("Failed to create order: {}", e);
            payment_error_to_response(e)
        })?;

    info!("Created {} order {}", provider, request.merchant_order_id);
    Ok(Json(body))
}

/// Fetch order status from a gateway
#[instrument(skip(state))]
pub async fn order_status(
    State(state): State<AppState>,
    Path((provider, order_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let gateway = lookup_gateway(&state, &provider)?;

    let body = gateway.order_status(&order_id).await.map_err(|e| {
        error!("Failed to fetch order status: {}", e);
        payment_error_to_response(e)
    })?;

    Ok(Json(body))
}

/// Refund a payment
#[instrument(
    skip(state, request),
    fields(gateway = %provider, transaction_id = %request.transaction_id)
)]
pub async fn refund(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(request): Json<RefundRequest>,
) -> Result<Json<Value>, ApiError> {
    let gateway = lookup_gateway(&state, &provider)?;

    let body = gateway.refund(&request).await.map_err(|e| {
        error!("Failed to refund: {}", e);
        payment_error_to_response(e)
    })?;

    Ok(Json(body))
}

/// Verify and normalize an inbound gateway webhook
#[instrument(skip(state, headers, body))]
pub async fn webhook(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<NormalizedWebhook>, ApiError> {
    let gateway = lookup_gateway(&state, &provider)?;

    gateway
        .verify_webhook(&body, &webhook_signature(&headers))
        .map_err(|e| {
            error!("Webhook verification failed: {}", e);
            payment_error_to_response(e)
        })?;

    // Non-JSON bodies go through normalization as `null`; whether that is
    // an error is up to the gateway.
    let payload: Value = serde_json::from_slice(&body).unwrap_or_else(|e| {
        warn!("Webhook body is not JSON: {}", e);
        Value::Null
    });

    let event = gateway.normalize_webhook(&payload).map_err(|e| {
        error!("Webhook normalization failed: {}", e);
        payment_error_to_response(e)
    })?;

    info!(
        "Received {} webhook: processed={}, order={:?}, status={:?}, success={}",
        provider, event.processed, event.order_id, event.status, event.success
    );

    Ok(Json(event))
}

/// List all courses
pub async fn list_courses(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "courses": state.catalog.courses,
        "count": state.catalog.len()
    }))
}

/// Get a single course as JSON
pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<u32>,
) -> Result<impl IntoResponse, ApiError> {
    let course = state
        .catalog
        .require(course_id)
        .map_err(payment_error_to_response)?;

    Ok(Json(course.clone()))
}

/// Course detail page (`/courses/detail?id=3`)
pub async fn course_detail(
    State(state): State<AppState>,
    Query(query): Query<CourseQuery>,
) -> (StatusCode, Html<String>) {
    let Some(id) = query.id.as_deref().and_then(|raw| raw.trim().parse::<u32>().ok()) else {
        return (
            StatusCode::BAD_REQUEST,
            Html(pages::course_not_found("A numeric course id is required.")),
        );
    };

    match state.catalog.get(id) {
        Some(course) => (StatusCode::OK, Html(pages::course_detail(course))),
        None => (
            StatusCode::NOT_FOUND,
            Html(pages::course_not_found(&format!("No course with id {}.", id))),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
        assert!(err.details.is_none());
    }

    #[test]
    fn test_payment_error_conversion() {
        let (status, _json) =
            payment_error_to_response(PaymentError::InvalidRequest("Bad data".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, Json(body)) =
            payment_error_to_response(PaymentError::gateway("phonepe", 401, "expired token"));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.details.as_deref(), Some("gateway responded with HTTP 401"));
    }

    #[test]
    fn test_webhook_signature_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", "abc".parse().unwrap());
        headers.insert("x-webhook-signature", "sig".parse().unwrap());
        headers.insert("x-webhook-timestamp", "1700".parse().unwrap());

        let sig = webhook_signature(&headers);
        assert_eq!(sig.authorization.as_deref(), Some("abc"));
        assert_eq!(sig.signature.as_deref(), Some("sig"));
        assert_eq!(sig.timestamp.as_deref(), Some("1700"));
    }
}
