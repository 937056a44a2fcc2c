//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a monetary amount scoped to a currency code.
///
/// The currency is kept as a code rather than an enum so that the currency
/// table stays data-driven. Codes are normalised to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major units (e.g., 12.34 for twelve dollars 34 cents).
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g., "INR", "USD").
    pub currency: String,
}

impl Money {
    /// Creates a new Money instance, normalising the currency code.
    #[must_use]
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount,
            currency: normalize_code(currency),
        }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: &str) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        !self.amount.is_zero() && self.amount.is_sign_negative()
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        !self.amount.is_zero() && self.amount.is_sign_positive()
    }

    /// Returns true if both values carry the same currency code.
    #[must_use]
    pub fn same_currency(&self, other: &Self) -> bool {
        self.currency == other.currency
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Upper-cases and trims a currency code.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
