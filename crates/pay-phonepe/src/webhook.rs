//! # PhonePe Webhook Handling
//!
//! PhonePe authenticates webhooks with an `Authorization` header holding
//! `hex(SHA256("<username>:<password>"))`, where the credentials are the ones
//! configured on the merchant dashboard.
//!
//! Two payload shapes are accepted:
//! - v2 events: `{ "event": "...", "payload": { "merchantOrderId", "state", "amount", .. } }`
//! - v1 callbacks: `{ "success": true, "code": "...", "data": { "merchantTransactionId", .. } }`,
//!   optionally wrapped as `{ "response": "<base64 json>" }`
//!
//! Normalization never fails: anything without a nested order object comes
//! back as `processed: false`.

use crate::http::PROVIDER;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pay_core::{constant_time_eq, NormalizedWebhook, PaymentError, PaymentResult};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

/// Order id keys, in lookup order
const ORDER_ID_KEYS: &[&str] = &["merchantOrderId", "merchantTransactionId", "orderId"];

/// Terminal success state
pub const STATE_COMPLETED: &str = "COMPLETED";

/// Expected `Authorization` header value
pub fn authorization_digest(username: &str, password: &str) -> String {
    let digest = Sha256::digest(format!("{}:{}", username, password).as_bytes());
    hex::encode(digest)
}

/// Check the webhook `Authorization` header
pub fn verify_authorization(
    username: &str,
    password: &str,
    header: Option<&str>,
) -> PaymentResult<()> {
    let header = header.ok_or_else(|| {
        PaymentError::WebhookVerificationFailed("Missing Authorization header".to_string())
    })?;

    let provided = header
        .trim()
        .trim_start_matches("SHA256")
        .trim()
        .to_ascii_lowercase();
    let expected = authorization_digest(username, password);

    if constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        warn!("PhonePe webhook authorization mismatch");
        Err(PaymentError::WebhookVerificationFailed(
            "Authorization mismatch".to_string(),
        ))
    }
}

/// Unwrap a `{ "response": "<base64 json>" }` envelope
fn decode_envelope(payload: &Value) -> Option<Value> {
    let encoded = payload.get("response")?.as_str()?;
    let bytes = STANDARD.decode(encoded).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Normalize a PhonePe webhook payload
pub fn normalize(payload: &Value) -> NormalizedWebhook {
    let decoded = decode_envelope(payload);
    let root = decoded.as_ref().unwrap_or(payload);

    let data = root
        .get("data")
        .or_else(|| root.get("payload"))
        .filter(|v| v.is_object());

    let Some(data) = data else {
        debug!("PhonePe webhook without order data");
        return NormalizedWebhook::unprocessed(PROVIDER);
    };

    let order_id = ORDER_ID_KEYS
        .iter()
        .find_map(|key| data.get(*key).and_then(Value::as_str))
        .map(String::from);

    let status = data.get("state").and_then(Value::as_str).map(String::from);
    let amount = data.get("amount").and_then(Value::as_i64);

    let success = match root.get("success").and_then(Value::as_bool) {
        Some(flag) => flag,
        None => status.as_deref() == Some(STATE_COMPLETED),
    };

    NormalizedWebhook {
        processed: true,
        provider: PROVIDER.to_string(),
        order_id,
        status,
        amount,
        success,
    }
}
