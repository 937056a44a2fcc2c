//! Rounding service.
//!
//! The engine splits a value into the part kept at the target scale and the
//! discarded remainder, then decides from the remainder whether to step one
//! minor unit away from zero. `rust_decimal::RoundingStrategy` has no
//! half-towards-infinity variants, so the decision is made here for every mode
//! instead of delegating some modes and not others.

use std::cmp::Ordering;

use rust_decimal::{Decimal, RoundingStrategy};
use tally_shared::config::MAX_SCALE;
use tally_shared::RoundingMode;

use super::types::RoundingAdjustment;
use crate::currency::{CurrencyConfig, CurrencyRegistry};

/// Rounding service.
///
/// All functions are pure; results always carry exactly the requested scale
/// (clamped to 28, the largest scale `Decimal` supports).
pub struct RoundingService;

impl RoundingService {
    /// Returns one minor unit at `scale`, e.g. `0.01` for scale 2.
    #[must_use]
    pub fn minor_unit(scale: u32) -> Decimal {
        Decimal::new(1, scale.min(MAX_SCALE))
    }

    /// Round `value` to `scale` fractional digits using `mode`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tally_core::{RoundingMode, RoundingService};
    ///
    /// assert_eq!(RoundingService::round(dec!(2.5), 0, RoundingMode::HalfEven), dec!(2));
    /// assert_eq!(RoundingService::round(dec!(3.5), 0, RoundingMode::HalfEven), dec!(4));
    /// assert_eq!(RoundingService::round(dec!(2.5), 0, RoundingMode::HalfCeiling), dec!(3));
    /// assert_eq!(RoundingService::round(dec!(2000), 2, RoundingMode::HalfEven).to_string(), "2000.00");
    /// ```
    #[must_use]
    pub fn round(value: Decimal, scale: u32, mode: RoundingMode) -> Decimal {
        let scale = scale.min(MAX_SCALE);
        let truncated = value.round_dp_with_strategy(scale, RoundingStrategy::ToZero);
        let remainder = value - truncated;

        let mut rounded = if remainder.is_zero() || !Self::rounds_away(truncated, remainder, scale, mode)
        {
            truncated
        } else if remainder.is_sign_negative() {
            truncated - Self::minor_unit(scale)
        } else {
            truncated + Self::minor_unit(scale)
        };

        rounded.rescale(scale);
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        rounded
    }

    /// Round and report the signed adjustment `rounded - original`.
    #[must_use]
    pub fn round_with_adjustment(value: Decimal, scale: u32, mode: RoundingMode) -> RoundingAdjustment {
        let scale = scale.min(MAX_SCALE);
        RoundingAdjustment::new(value, Self::round(value, scale, mode), scale, mode)
    }

    /// Round using a currency's scale and default mode.
    #[must_use]
    pub fn round_for(value: Decimal, currency: &CurrencyConfig) -> Decimal {
        Self::round(value, currency.scale, currency.rounding_mode)
    }

    /// Round using the scale and mode registered for `code`.
    ///
    /// Unknown codes fall back to the registry defaults (scale 2, `HALF_EVEN`).
    #[must_use]
    pub fn round_for_currency(value: Decimal, code: &str) -> Decimal {
        Self::round_for(value, &CurrencyRegistry::global().resolve(code))
    }

    /// Currency-aware [`Self::round_with_adjustment`].
    #[must_use]
    pub fn round_with_adjustment_for_currency(value: Decimal, code: &str) -> RoundingAdjustment {
        let currency = CurrencyRegistry::global().resolve(code);
        Self::round_with_adjustment(value, currency.scale, currency.rounding_mode)
    }

    /// Decides whether the nonzero `remainder` pushes the result one unit
    /// away from zero.
    fn rounds_away(truncated: Decimal, remainder: Decimal, scale: u32, mode: RoundingMode) -> bool {
        let positive = remainder.is_sign_positive();
        // Some(away) when the remainder is not exactly half a unit.
        let nearest = || match (remainder.abs() * Decimal::TWO).cmp(&Self::minor_unit(scale)) {
            Ordering::Greater => Some(true),
            Ordering::Less => Some(false),
            Ordering::Equal => None,
        };

        match mode {
            RoundingMode::Up => true,
            RoundingMode::Down => false,
            RoundingMode::Ceiling => positive,
            RoundingMode::Floor => !positive,
            RoundingMode::HalfUp => nearest().unwrap_or(true),
            RoundingMode::HalfDown => nearest().unwrap_or(false),
            RoundingMode::HalfEven => {
                nearest().unwrap_or_else(|| Self::last_digit_is_odd(truncated, scale))
            }
            RoundingMode::HalfCeiling => nearest().unwrap_or(positive),
            RoundingMode::HalfFloor => nearest().unwrap_or(!positive),
        }
    }

    fn last_digit_is_odd(truncated: Decimal, scale: u32) -> bool {
        let mut kept = truncated;
        kept.rescale(scale);
        kept.mantissa() % 2 != 0
    }
}
