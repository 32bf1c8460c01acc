//! Response handling shared by the OAuth and PG calls.

use pay_core::{PaymentError, PaymentResult};
use reqwest::RequestBuilder;
use serde_json::Value;
use tracing::error;

pub(crate) const PROVIDER: &str = "phonepe";

/// Send a request and return the JSON body of a 2xx response.
pub(crate) async fn send_json(request: RequestBuilder, operation: &str) -> PaymentResult<Value> {
    let response = request.send().await.map_err(|e| {
        error!("PhonePe {} request failed: {}", operation, e);
        PaymentError::Network(e.to_string())
    })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| PaymentError::Network(e.to_string()))?;

    if !status.is_success() {
        error!(
            "PhonePe {} error: status={}, body={}",
            operation, status, body
        );
        return Err(PaymentError::gateway(
            PROVIDER,
            status.as_u16(),
            vendor_message(&body),
        ));
    }

    serde_json::from_str(&body).map_err(|e| {
        PaymentError::Serialization(format!(
            "Failed to parse PhonePe {} response: {}",
            operation, e
        ))
    })
}

/// Best-effort extraction of the vendor's error message
pub(crate) fn vendor_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return if body.is_empty() {
            "empty response".to_string()
        } else {
            body.to_string()
        };
    };

    ["message", "error_description", "errorCode", "code"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(String::from)
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_message() {
        assert_eq!(
            vendor_message(r#"{"code":"BAD_REQUEST","message":"Invalid amount"}"#),
            "Invalid amount"
        );
        assert_eq!(vendor_message(r#"{"code":"UNAUTHORIZED"}"#), "UNAUTHORIZED");
        assert_eq!(vendor_message("gateway timeout"), "gateway timeout");
        assert_eq!(vendor_message(""), "empty response");
    }
}
