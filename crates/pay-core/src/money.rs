//! # Money Types
//!
//! Currency codes and minor-unit amounts. Gateways are always handed
//! amounts in the smallest currency unit (paise for INR) so no float
//! ever reaches a vendor request unrounded.

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }

    /// Number of decimal places in the minor unit
    pub fn decimal_places(&self) -> u8 {
        2
    }

    /// Convert a major-unit amount to the smallest currency unit,
    /// rounding to the nearest integer.
    pub fn to_minor_units(&self, amount: f64) -> PaymentResult<i64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PaymentError::InvalidRequest(format!(
                "amount must be a positive number, got {}",
                amount
            )));
        }
        let multiplier = 10_f64.powi(self.decimal_places() as i32);
        let minor = (amount * multiplier).round();
        if minor >= i64::MAX as f64 {
            return Err(PaymentError::InvalidRequest(format!(
                "amount {} is too large",
                amount
            )));
        }
        Ok(minor as i64)
    }

    /// Convert from smallest unit back to major units
    pub fn from_minor_units(&self, amount: i64) -> f64 {
        let divisor = 10_f64.powi(self.decimal_places() as i32);
        amount as f64 / divisor
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amount in the smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in minor units (paise for INR)
    pub amount: i64,
    pub currency: Currency,
}

impl Price {
    /// Create a price from a major-unit amount
    pub fn new(amount: f64, currency: Currency) -> PaymentResult<Self> {
        Ok(Self {
            amount: currency.to_minor_units(amount)?,
            currency,
        })
    }

    /// Create a price from minor units
    pub fn from_minor(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Get the major-unit amount
    pub fn as_decimal(&self) -> f64 {
        self.currency.from_minor_units(self.amount)
    }

    /// Format for display (e.g., "₹500.00")
    pub fn display(&self) -> String {
        let symbol = match self.currency {
            Currency::INR => "₹",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
        };
        format!("{}{:.2}", symbol, self.as_decimal())
    }
}
