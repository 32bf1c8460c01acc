//! # Order Types
//!
//! Order, refund and webhook types shared by every gateway.

use crate::clock::Clock;
use crate::error::{PaymentError, PaymentResult};
use crate::money::{Currency, Price};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Buyer contact details
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    /// Merchant-side customer id (Cashfree requires one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Phone number
    pub phone: String,
}

impl Customer {
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Customer id, or one derived from the phone number.
    /// Only alphanumerics, `_` and `-` survive.
    pub fn id_or_derived(&self) -> String {
        let source = self.id.as_deref().unwrap_or(&self.phone);
        let cleaned: String = source
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        if cleaned.is_empty() {
            "guest".to_string()
        } else {
            format!("cust_{}", cleaned)
        }
    }
}

/// Request to create an order with a gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrder {
    /// Buyer-supplied merchant order id
    pub merchant_order_id: String,

    /// Amount in major units (rupees)
    pub amount: f64,

    #[serde(default)]
    pub currency: Currency,

    pub customer: Customer,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateOrder {
    pub fn new(merchant_order_id: impl Into<String>, amount: f64, customer: Customer) -> Self {
        Self {
            merchant_order_id: merchant_order_id.into(),
            amount,
            currency: Currency::INR,
            customer,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate and convert the amount to minor units
    pub fn price(&self) -> PaymentResult<Price> {
        if self.merchant_order_id.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "merchant_order_id must not be empty".to_string(),
            ));
        }
        Price::new(self.amount, self.currency)
    }
}

/// Gateway-side view of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Vendor-assigned identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub merchant_order_id: String,

    /// Amount in minor units
    pub amount: i64,

    pub currency: Currency,

    /// Vendor status string (not unified across gateways)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Request to refund a captured payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundRequest {
    /// Transaction / payment identifier being refunded
    pub transaction_id: String,

    /// Amount in major units
    pub amount: f64,

    #[serde(default)]
    pub currency: Currency,

    /// Owning order id (needed by gateways that scope refunds per order)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RefundRequest {
    pub fn new(transaction_id: impl Into<String>, amount: f64) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            amount,
            currency: Currency::INR,
            order_id: None,
            note: None,
        }
    }

    pub fn for_order(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn price(&self) -> PaymentResult<Price> {
        if self.transaction_id.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "transaction_id must not be empty".to_string(),
            ));
        }
        Price::new(self.amount, self.currency)
    }
}

/// Unique, timestamp-based refund reference: `<PREFIX>_<millis>_<6 hex>`
pub fn refund_reference(prefix: &str, clock: &dyn Clock) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", prefix, clock.now_millis(), &suffix[..6])
}

/// Fixed-shape result of normalizing a vendor webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedWebhook {
    /// Whether the payload carried recognizable order data
    pub processed: bool,

    pub provider: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Amount in minor units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,

    pub success: bool,
}

impl NormalizedWebhook {
    /// Result for a payload that carried no order data
    pub fn unprocessed(provider: impl Into<String>) -> Self {
        Self {
            processed: false,
            provider: provider.into(),
            order_id: None,
            status: None,
            amount: None,
            success: false,
        }
    }
}

/// Authentication headers that accompany an inbound webhook
#[derive(Debug, Clone, Default)]
pub struct WebhookSignature {
    /// `Authorization` header (PhonePe)
    pub authorization: Option<String>,
    /// `x-webhook-signature` header (Cashfree)
    pub signature: Option<String>,
    /// `x-webhook-timestamp` header (Cashfree)
    pub timestamp: Option<String>,
}

/// Constant-time equality for signature comparison
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
