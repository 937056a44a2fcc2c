//! Rounding result types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::RoundingMode;

/// Audit record of a single rounding step.
///
/// `adjustment` is always `rounded - original`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingAdjustment {
    /// Value before rounding.
    pub original: Decimal,
    /// Value after rounding.
    pub rounded: Decimal,
    /// Signed difference `rounded - original`.
    pub adjustment: Decimal,
    /// Scale the value was rounded to.
    pub scale: u32,
    /// Mode used.
    pub mode: RoundingMode,
    /// True if the adjustment is nonzero.
    pub has_adjustment: bool,
}

impl RoundingAdjustment {
    /// Builds a record from an original and a rounded value.
    #[must_use]
    pub fn new(original: Decimal, rounded: Decimal, scale: u32, mode: RoundingMode) -> Self {
        let adjustment = rounded - original;
        Self {
            original,
            rounded,
            adjustment,
            scale,
            mode,
            has_adjustment: !adjustment.is_zero(),
        }
    }

    /// A record for a value that needed no rounding.
    #[must_use]
    pub fn none(value: Decimal, scale: u32, mode: RoundingMode) -> Self {
        Self::new(value, value, scale, mode)
    }
}
