//! # Payment Error Types
//!
//! Typed error handling for the course-pay gateway wrappers.
//! Every gateway operation returns `Result<T, PaymentError>`, whichever
//! vendor it talks to.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing credentials, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Transport failure talking to the gateway
    #[error("Network error: {0}")]
    Network(String),

    /// Gateway answered with a non-success response
    #[error("Gateway error [{provider}] (HTTP {status}): {message}")]
    Gateway {
        provider: String,
        status: u16,
        message: String,
    },

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Course id not present in the catalog
    #[error("Course not found: {course_id}")]
    CourseNotFound { course_id: u32 },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PaymentError {
    /// Build a gateway error for `provider`
    pub fn gateway(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        PaymentError::Gateway {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            PaymentError::Network(_) => true,
            PaymentError::Gateway { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::Network(_) => 503,
            PaymentError::Gateway { .. } => 502,
            PaymentError::WebhookVerificationFailed(_) => 401,
            PaymentError::WebhookParseError(_) => 400,
            PaymentError::CourseNotFound { .. } => 404,
            PaymentError::Serialization(_) => 500,
            PaymentError::Internal(_) => 500,
        }
    }

    /// The vendor HTTP status, when the gateway produced one
    pub fn gateway_status(&self) -> Option<u16> {
        match self {
            PaymentError::Gateway { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
