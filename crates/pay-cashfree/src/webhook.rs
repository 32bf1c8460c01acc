//! # Cashfree Webhook Handling
//!
//! Cashfree signs each webhook as
//! `base64(HMAC-SHA256(secret_key, x-webhook-timestamp + raw_body))` and
//! sends it in `x-webhook-signature`.
//!
//! Payload shape (`PAYMENT_SUCCESS_WEBHOOK` and friends):
//!
//! ```json
//! { "type": "PAYMENT_SUCCESS_WEBHOOK",
//!   "data": { "order": { "order_id": "ORD1", "order_amount": 500.0 },
//!             "payment": { "cf_payment_id": 885, "payment_status": "PAID" } } }
//! ```

use crate::gateway::PROVIDER;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use pay_core::{constant_time_eq, Currency, NormalizedWebhook, PaymentError, PaymentResult};
use serde_json::Value;
use sha2::Sha256;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Status string that marks a successful payment
pub const STATUS_PAID: &str = "PAID";

/// Timestamps below this are epoch seconds
const SECONDS_THRESHOLD: i64 = 9_999_999_999;

/// Compute the expected signature for a webhook body
pub fn compute_signature(secret: &str, timestamp: &str, payload: &[u8]) -> PaymentResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::Internal(format!("Invalid HMAC key: {}", e)))?;
    mac.update(timestamp.as_bytes());
    mac.update(payload);
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Verify the `x-webhook-signature` header
pub fn verify_signature(
    secret: &str,
    timestamp: Option<&str>,
    payload: &[u8],
    signature: Option<&str>,
) -> PaymentResult<()> {
    let timestamp = timestamp.ok_or_else(|| {
        PaymentError::WebhookVerificationFailed("Missing x-webhook-timestamp header".to_string())
    })?;
    let signature = signature.ok_or_else(|| {
        PaymentError::WebhookVerificationFailed("Missing x-webhook-signature header".to_string())
    })?;

    let expected = compute_signature(secret, timestamp, payload)?;
    if constant_time_eq(signature.trim().as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        warn!("Cashfree webhook signature mismatch");
        Err(PaymentError::WebhookVerificationFailed(
            "Signature mismatch".to_string(),
        ))
    }
}

/// Reject a signed timestamp more than `tolerance_secs` away from now.
/// Accepts epoch seconds or milliseconds; `tolerance_secs == 0` disables.
pub fn check_timestamp(
    timestamp: &str,
    now_millis: i64,
    tolerance_secs: u64,
) -> PaymentResult<()> {
    if tolerance_secs == 0 {
        return Ok(());
    }

    let raw: i64 = timestamp.trim().parse().map_err(|_| {
        PaymentError::WebhookVerificationFailed(format!(
            "Invalid x-webhook-timestamp: {}",
            timestamp
        ))
    })?;
    let sent_millis = if raw < SECONDS_THRESHOLD {
        raw.saturating_mul(1000)
    } else {
        raw
    };

    let skew_millis = now_millis.saturating_sub(sent_millis).unsigned_abs();
    if skew_millis > tolerance_secs.saturating_mul(1000) {
        warn!(
            "Cashfree webhook timestamp outside window: skew={}ms, tolerance={}s",
            skew_millis, tolerance_secs
        );
        return Err(PaymentError::WebhookVerificationFailed(
            "Webhook timestamp outside tolerance window".to_string(),
        ));
    }
    Ok(())
}

/// Normalize a Cashfree webhook payload. Fails on malformed input.
pub fn normalize(payload: &Value) -> PaymentResult<NormalizedWebhook> {
    let data = payload
        .get("data")
        .filter(|v| v.is_object())
        .ok_or_else(|| PaymentError::WebhookParseError("Missing data object".to_string()))?;

    let order = data
        .get("order")
        .filter(|v| v.is_object())
        .ok_or_else(|| PaymentError::WebhookParseError("Missing data.order".to_string()))?;

    let order_id = order
        .get("order_id")
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| PaymentError::WebhookParseError("Missing data.order.order_id".to_string()))?;

    let status = data
        .get("payment")
        .and_then(|p| p.get("payment_status"))
        .or_else(|| order.get("order_status"))
        .and_then(Value::as_str)
        .map(String::from);

    let currency = order
        .get("order_currency")
        .cloned()
        .and_then(|c| serde_json::from_value::<Currency>(c).ok())
        .unwrap_or_default();

    let amount = match order.get("order_amount").and_then(Value::as_f64) {
        Some(major) => Some(currency.to_minor_units(major).map_err(|e| {
            PaymentError::WebhookParseError(format!("Invalid data.order.order_amount: {}", e))
        })?),
        None => None,
    };

    let success = status.as_deref() == Some(STATUS_PAID);
    debug!(
        "Cashfree webhook {:?} for order {}: status={:?}",
        payload.get("type").and_then(|v| v.as_str()),
        order_id,
        status
    );

    Ok(NormalizedWebhook {
        processed: true,
        provider: PROVIDER.to_string(),
        order_id: Some(order_id),
        status,
        amount,
        success,
    })
}
