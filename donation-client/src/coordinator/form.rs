//! Donation form input

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Amount is required")]
    AmountRequired,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount must be greater than zero")]
    AmountNotPositive,
}

/// Raw form fields, as typed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationForm {
    /// BTC amount (decimal string)
    pub amount: String,
    /// Donor name (optional)
    #[serde(default)]
    pub name: String,
    /// Message (optional)
    #[serde(default)]
    pub message: String,
}

impl DonationForm {
    pub fn new(amount: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Parse the amount; it must be a positive number
    pub fn validate(&self) -> Result<Decimal, FormError> {
        parse_amount(&self.amount)
    }

    pub fn clear(&mut self) {
        self.amount.clear();
        self.name.clear();
        self.message.clear();
    }
}

/// Parse a user-entered BTC amount
pub fn parse_amount(input: &str) -> Result<Decimal, FormError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(FormError::AmountRequired);
    }

    let amount = Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .map_err(|_| FormError::InvalidAmount(input.to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(FormError::AmountNotPositive);
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("0.001"), Ok(Decimal::from_str("0.001").unwrap()));
        assert_eq!(parse_amount(" 2 "), Ok(Decimal::from(2)));
        assert_eq!(parse_amount("1e-3"), Ok(Decimal::from_str("0.001").unwrap()));
    }

    #[test]
    fn test_parse_amount_rejects() {
        assert_eq!(parse_amount(""), Err(FormError::AmountRequired));
        assert_eq!(parse_amount("   "), Err(FormError::AmountRequired));
        assert_eq!(parse_amount("0"), Err(FormError::AmountNotPositive));
        assert_eq!(parse_amount("-1"), Err(FormError::AmountNotPositive));
        assert!(matches!(parse_amount("abc"), Err(FormError::InvalidAmount(_))));
    }

    #[test]
    fn test_clear() {
        let mut form = DonationForm::new("1").with_name("a").with_message("b");
        form.clear();
        assert_eq!(form, DonationForm::default());
    }
}
