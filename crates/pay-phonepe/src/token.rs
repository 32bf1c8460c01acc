//! # PhonePe OAuth Token Cache
//!
//! Client-credentials token, memoized until shortly before it expires.
//!
//! The cached expiry is stored with the safety margin already subtracted, so
//! a token is reused only while `expires_at_millis > now`. Refreshes are
//! serialized behind one async mutex: concurrent callers that miss the cache
//! wait for a single token request instead of each issuing their own.

use crate::config::PhonePeConfig;
use crate::http::{send_json, PROVIDER};
use pay_core::{PaymentError, PaymentResult, SharedClock};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

/// Subtracted from the vendor expiry before caching
pub const EXPIRY_SAFETY_MARGIN_MS: i64 = 60_000;

/// `expires_at` values below this are epoch seconds
pub const SECONDS_THRESHOLD: i64 = 9_999_999_999;

/// Scheme PhonePe expects in the `Authorization` header
pub const AUTH_SCHEME: &str = "O-Bearer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub value: String,
    /// Vendor expiry in epoch millis, minus the safety margin
    pub expires_at_millis: i64,
}

impl CachedToken {
    pub fn is_valid_at(&self, now_millis: i64) -> bool {
        self.expires_at_millis > now_millis
    }
}

/// Normalize a vendor `expires_at` to epoch milliseconds
pub fn normalize_expiry_millis(expires_at: i64) -> i64 {
    if expires_at < SECONDS_THRESHOLD {
        expires_at * 1000
    } else {
        expires_at
    }
}

/// OAuth client credentials
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub client_version: String,
}

impl From<&PhonePeConfig> for OAuthCredentials {
    fn from(config: &PhonePeConfig) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            client_version: config.client_version.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Owned token cache with injected HTTP client and clock
pub struct TokenCache {
    client: Client,
    clock: SharedClock,
    token_url: String,
    credentials: OAuthCredentials,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new(
        client: Client,
        clock: SharedClock,
        token_url: impl Into<String>,
        credentials: OAuthCredentials,
    ) -> Self {
        Self {
            client,
            clock,
            token_url: token_url.into(),
            credentials,
            cached: Mutex::new(None),
        }
    }

    pub fn from_config(config: &PhonePeConfig, client: Client, clock: SharedClock) -> Self {
        Self::new(
            client,
            clock,
            config.endpoints.oauth.clone(),
            OAuthCredentials::from(config),
        )
    }

    /// Return a valid access token, fetching a new one on miss or expiry.
    #[instrument(skip(self))]
    pub async fn access_token(&self) -> PaymentResult<String> {
        let mut cached = self.cached.lock().await;
        let now = self.clock.now_millis();

        if let Some(token) = cached.as_ref() {
            if token.is_valid_at(now) {
                debug!("Reusing cached PhonePe token");
                return Ok(token.value.clone());
            }
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    /// `Authorization` header value for PG calls
    pub async fn authorization_header(&self) -> PaymentResult<String> {
        Ok(format!("{} {}", AUTH_SCHEME, self.access_token().await?))
    }

    /// Snapshot of the cached token, if any
    pub async fn cached(&self) -> Option<CachedToken> {
        self.cached.lock().await.clone()
    }

    /// Drop the cached token; the next call fetches a fresh one
    pub async fn clear(&self) {
        *self.cached.lock().await = None;
    }

    async fn request_token(&self) -> PaymentResult<CachedToken> {
        let creds = &self.credentials;
        if creds.client_id.trim().is_empty() || creds.client_secret.trim().is_empty() {
            return Err(PaymentError::Configuration(
                "PhonePe client id/secret not configured".to_string(),
            ));
        }

        let form = [
            ("client_id", creds.client_id.as_str()),
            ("client_version", creds.client_version.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let request = self.client.post(&self.token_url).form(&form);
        let body = send_json(request, "oauth").await?;

        let response: TokenResponse = serde_json::from_value(body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse PhonePe token response: {}", e))
        })?;

        let value = match response.access_token {
            Some(token) if !token.is_empty() => token,
            _ => {
                error!("PhonePe token response missing access_token");
                return Err(PaymentError::gateway(
                    PROVIDER,
                    200,
                    "token response missing access_token",
                ));
            }
        };

        let expires_at_ms = match (response.expires_at, response.expires_in) {
            (Some(at), _) => normalize_expiry_millis(at),
            (None, Some(secs)) => self.clock.now_millis() + secs * 1000,
            (None, None) => {
                return Err(PaymentError::gateway(
                    PROVIDER,
                    200,
                    "token response missing expires_at",
                ))
            }
        };

        let token = CachedToken {
            value,
            expires_at_millis: expires_at_ms - EXPIRY_SAFETY_MARGIN_MS,
        };
        info!(
            "Fetched PhonePe access token, valid until {}",
            token.expires_at_millis
        );
        Ok(token)
    }
}
