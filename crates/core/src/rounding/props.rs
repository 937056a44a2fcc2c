//! Property-based tests for the rounding engine.
//!
//! - Rounding is idempotent for every mode
//! - The adjustment never reaches a full minor unit
//! - Modes shared with `rust_decimal` agree with `round_dp_with_strategy`

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::RoundingMode;

use super::service::RoundingService;

/// Strategy to generate signed amounts with up to 6 decimal places.
fn signed_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000_000i64..1_000_000_000_000i64).prop_map(|v| Decimal::new(v, 6))
}

/// Strategy to generate a target scale (0 to 4).
fn target_scale() -> impl Strategy<Value = u32> {
    0u32..=4
}

/// Strategy to pick any rounding mode.
fn rounding_mode() -> impl Strategy<Value = RoundingMode> {
    prop::sample::select(RoundingMode::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Rounding an already rounded value returns it unchanged.
    #[test]
    fn prop_round_is_idempotent(
        value in signed_amount(),
        scale in target_scale(),
        mode in rounding_mode(),
    ) {
        let once = RoundingService::round(value, scale, mode);
        let twice = RoundingService::round(once, scale, mode);
        prop_assert_eq!(once, twice);
    }

    /// The result has exactly the requested scale.
    #[test]
    fn prop_round_has_target_scale(
        value in signed_amount(),
        scale in target_scale(),
        mode in rounding_mode(),
    ) {
        let rounded = RoundingService::round(value, scale, mode);
        prop_assert_eq!(rounded.scale(), scale);
    }

    /// |adjustment| < one minor unit; for half modes it is at most half a unit.
    #[test]
    fn prop_adjustment_is_bounded(
        value in signed_amount(),
        scale in target_scale(),
        mode in rounding_mode(),
    ) {
        let result = RoundingService::round_with_adjustment(value, scale, mode);
        let unit = RoundingService::minor_unit(scale);
        prop_assert!(result.adjustment.abs() < unit);
        if mode.is_tie_breaking() {
            prop_assert!(result.adjustment.abs() * Decimal::TWO <= unit);
        }
        prop_assert_eq!(result.original + result.adjustment, result.rounded);
    }

    /// Where `rust_decimal` has the same strategy, both agree.
    #[test]
    fn prop_matches_rust_decimal_strategies(
        value in signed_amount(),
        scale in target_scale(),
        mode in rounding_mode(),
    ) {
        if let Some(strategy) = mode.to_strategy() {
            let expected = value.round_dp_with_strategy(scale, strategy);
            prop_assert_eq!(RoundingService::round(value, scale, mode), expected);
        }
    }

    /// Ceiling never decreases a value and floor never increases it.
    #[test]
    fn prop_directed_modes_respect_direction(
        value in signed_amount(),
        scale in target_scale(),
    ) {
        prop_assert!(RoundingService::round(value, scale, RoundingMode::Ceiling) >= value);
        prop_assert!(RoundingService::round(value, scale, RoundingMode::Floor) <= value);
        prop_assert!(RoundingService::round(value, scale, RoundingMode::Down).abs() <= value.abs());
        prop_assert!(RoundingService::round(value, scale, RoundingMode::Up).abs() >= value.abs());
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// Specific example: 2.5 rounds to 2 (nearest even).
    #[test]
    fn test_half_even_2_5() {
        assert_eq!(RoundingService::round(dec!(2.5), 0, RoundingMode::HalfEven), dec!(2));
    }

    /// Specific example: -2.5 rounds to -2 (nearest even).
    #[test]
    fn test_half_even_negative_2_5() {
        assert_eq!(RoundingService::round(dec!(-2.5), 0, RoundingMode::HalfEven), dec!(-2));
    }

    /// Specific example: half ceiling and half floor split on sign.
    #[test]
    fn test_half_ceiling_and_floor_ties() {
        assert_eq!(RoundingService::round(dec!(-2.5), 0, RoundingMode::HalfCeiling), dec!(-2));
        assert_eq!(RoundingService::round(dec!(-2.5), 0, RoundingMode::HalfFloor), dec!(-3));
        assert_eq!(RoundingService::round(dec!(2.5), 0, RoundingMode::HalfFloor), dec!(2));
    }
}
