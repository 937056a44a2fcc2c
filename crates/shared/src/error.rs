//! Calculation error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using `CalcError`.
pub type CalcResult<T> = Result<T, CalcError>;

/// Errors raised by the rounding and conservation engine.
///
/// Input sanitisation problems are not errors: they are clamped and reported
/// alongside the result instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Division by a zero divisor.
    #[error("Division by zero")]
    DivisionByZero,

    /// Two currency-scoped values with different codes were combined.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch {
        /// Currency of the left-hand operand.
        expected: String,
        /// Currency of the offending operand.
        got: String,
    },

    /// Allocation weights were rejected.
    #[error("Invalid allocation weights: {0}")]
    InvalidWeights(String),

    /// Residual redistribution did not converge within its safety bound.
    #[error("Residual redistribution exceeded {iterations} iterations with {residual} left")]
    RedistributionLimitExceeded {
        /// Number of steps performed before giving up.
        iterations: usize,
        /// Residual that could not be placed.
        residual: Decimal,
    },

    /// A decimal result could not be represented.
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    /// A decimal string could not be parsed.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A rounding mode name was not recognised.
    #[error("Invalid rounding mode: {0}")]
    InvalidRoundingMode(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CalcError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DivisionByZero => "DIVISION_BY_ZERO",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::InvalidWeights(_) => "INVALID_WEIGHTS",
            Self::RedistributionLimitExceeded { .. } => "REDISTRIBUTION_LIMIT_EXCEEDED",
            Self::Overflow(_) => "ARITHMETIC_OVERFLOW",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidRoundingMode(_) => "INVALID_ROUNDING_MODE",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Returns true if this error signals an internal invariant violation
    /// rather than bad caller input.
    #[must_use]
    pub const fn is_defect(&self) -> bool {
        matches!(self, Self::RedistributionLimitExceeded { .. })
    }
}

impl From<config::ConfigError> for CalcError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
