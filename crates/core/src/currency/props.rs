//! Property-based tests for currency operations.
//!
//! - Conservation: distributed and allocated shares sum exactly to the total
//! - Shares are individually rounded to the target scale
//! - Equal distribution never spreads shares by more than one minor unit

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::{Money, RoundingMode};

use super::allocation::AllocationUtil;
use super::money_ops::{add_money, subtract_money};
use crate::rounding::RoundingService;

/// Strategy to generate signed totals already at `scale` (up to ±1,000,000).
fn total_at_scale(scale: u32) -> impl Strategy<Value = Decimal> {
    let bound = 1_000_000i64 * 10i64.pow(scale);
    (-bound..bound).prop_map(move |units| Decimal::new(units, scale))
}

/// Strategy to generate (scale, total) pairs with scale 0 to 4.
fn scaled_total() -> impl Strategy<Value = (u32, Decimal)> {
    (0u32..=4).prop_flat_map(|scale| (Just(scale), total_at_scale(scale)))
}

/// Strategy to generate share count (1 to 100).
fn share_count() -> impl Strategy<Value = usize> {
    1usize..100
}

/// Strategy to generate non-negative weights with a positive sum.
fn weights() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(0u32..1000, 1..12)
        .prop_filter("weights must not all be zero", |w| w.iter().any(|v| *v > 0))
        .prop_map(|w| w.into_iter().map(Decimal::from).collect())
}

/// Strategy to generate weights where about half the parties weigh nothing.
fn sparse_weights() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(prop_oneof![Just(0u32), 1u32..100], 1..12)
        .prop_filter("weights must not all be zero", |w| w.iter().any(|v| *v > 0))
        .prop_map(|w| w.into_iter().map(Decimal::from).collect())
}

/// Strategy to pick any rounding mode.
fn rounding_mode() -> impl Strategy<Value = RoundingMode> {
    prop::sample::select(RoundingMode::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Sum of distribute() equals the total and there are exactly n shares.
    #[test]
    fn prop_distribute_conserves_total(
        (scale, total) in scaled_total(),
        count in share_count(),
        mode in rounding_mode(),
    ) {
        let shares = AllocationUtil::distribute(total, count, scale, mode).unwrap();
        prop_assert_eq!(shares.len(), count);
        prop_assert_eq!(shares.iter().copied().sum::<Decimal>(), total);
    }

    /// Every share is already rounded to the target scale.
    #[test]
    fn prop_distribute_shares_are_at_scale(
        (scale, total) in scaled_total(),
        count in share_count(),
    ) {
        let shares = AllocationUtil::distribute(total, count, scale, RoundingMode::HalfEven).unwrap();
        for share in shares {
            prop_assert_eq!(RoundingService::round(share, scale, RoundingMode::Down), share);
        }
    }

    /// Equal shares differ from each other by at most one minor unit.
    #[test]
    fn prop_distribute_is_as_equal_as_possible(
        (scale, total) in scaled_total(),
        count in share_count(),
    ) {
        let shares = AllocationUtil::distribute(total, count, scale, RoundingMode::HalfEven).unwrap();
        let max = shares.iter().copied().max().unwrap_or_default();
        let min = shares.iter().copied().min().unwrap_or_default();
        prop_assert!(max - min <= RoundingService::minor_unit(scale));
    }

    /// Sum of allocate() equals the total for any non-negative weights.
    #[test]
    fn prop_allocate_conserves_total(
        (scale, total) in scaled_total(),
        weights in weights(),
        mode in rounding_mode(),
    ) {
        let shares = AllocationUtil::allocate(total, &weights, scale, mode).unwrap();
        prop_assert_eq!(shares.len(), weights.len());
        prop_assert_eq!(shares.iter().copied().sum::<Decimal>(), total);
    }

    /// Zero-weight parties get nothing and no share has the opposite sign of the total.
    #[test]
    fn prop_allocate_respects_zero_weights_and_sign(
        (scale, total) in scaled_total(),
        weights in sparse_weights(),
        mode in rounding_mode(),
    ) {
        let shares = AllocationUtil::allocate(total, &weights, scale, mode).unwrap();
        prop_assert_eq!(shares.iter().copied().sum::<Decimal>(), total);
        for (share, weight) in shares.iter().zip(&weights) {
            if weight.is_zero() {
                prop_assert!(share.is_zero(), "zero weight got {}", share);
            }
            if total.is_sign_negative() {
                prop_assert!(*share <= Decimal::ZERO);
            } else {
                prop_assert!(*share >= Decimal::ZERO);
            }
        }
    }

    /// Scales above the default division precision still conserve the total.
    #[test]
    fn prop_distribute_conserves_total_at_fine_scales(
        units in -1_000_000i64..1_000_000,
        scale in 21u32..=25,
        count in 1usize..20,
    ) {
        let total = Decimal::new(units, scale);
        let shares = AllocationUtil::distribute(total, count, scale, RoundingMode::HalfEven).unwrap();
        prop_assert_eq!(shares.iter().copied().sum::<Decimal>(), total);
    }

    /// Allocation is deterministic.
    #[test]
    fn prop_allocate_is_deterministic(
        (scale, total) in scaled_total(),
        weights in weights(),
    ) {
        let first = AllocationUtil::allocate(total, &weights, scale, RoundingMode::HalfEven).unwrap();
        let second = AllocationUtil::allocate(total, &weights, scale, RoundingMode::HalfEven).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Adding then subtracting the same amount returns the original money.
    #[test]
    fn prop_add_subtract_inverse(
        a in total_at_scale(2),
        b in total_at_scale(2),
    ) {
        let left = Money::new(a, "INR");
        let right = Money::new(b, "INR");
        let sum = add_money(&left, &right).unwrap();
        prop_assert_eq!(subtract_money(&sum, &right).unwrap(), left);
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// Specific example: 10/3 = [3.34, 3.33, 3.33], sum = 10.00.
    #[test]
    fn test_distribute_10_by_3() {
        let result = AllocationUtil::distribute(dec!(10), 3, 2, RoundingMode::HalfEven).unwrap();
        assert_eq!(result, vec![dec!(3.34), dec!(3.33), dec!(3.33)]);
    }

    /// Specific example: 1000 split 3:2:1 sums to 1000.
    #[test]
    fn test_allocate_1000_by_3_2_1() {
        let weights = [dec!(3), dec!(2), dec!(1)];
        let result = AllocationUtil::allocate(dec!(1000), &weights, 2, RoundingMode::HalfEven).unwrap();
        assert_eq!(result.iter().sum::<Decimal>(), dec!(1000));
    }
}
