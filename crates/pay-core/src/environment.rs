//! Gateway environment flag (sandbox vs production endpoints).

use crate::error::PaymentError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl GatewayEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayEnvironment::Sandbox => "sandbox",
            GatewayEnvironment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, GatewayEnvironment::Production)
    }
}

impl FromStr for GatewayEnvironment {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" | "live" => Ok(GatewayEnvironment::Production),
            "sandbox" | "uat" | "test" | "preprod" => Ok(GatewayEnvironment::Sandbox),
            other => Err(PaymentError::Configuration(format!(
                "Unknown gateway environment: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for GatewayEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
