//! Amount allocation with an exact-sum guarantee.
//!
//! Both equal distribution and weighted allocation work the same way:
//! 1. Calculate each share and round it to the target scale
//! 2. Calculate the residual (total - sum of rounded shares)
//! 3. Hand the residual out one minor unit at a time, in ascending index
//!    order, wrapping around, until nothing is left
//!
//! The sum of the returned shares is always exactly the original total.

use rust_decimal::Decimal;
use tally_shared::{CalcError, CalcResult, Money, RoundingMode};

use super::registry::CurrencyRegistry;
use crate::decimal;
use crate::rounding::RoundingService;

/// Residual redistribution may take at most this many steps per share.
const REDISTRIBUTION_FACTOR: usize = 10;

/// Allocation utility for distributing amounts.
///
/// Guarantees:
/// - Shares are individually rounded to the target scale
/// - Sum of shares EXACTLY equals the original total
/// - Identical inputs always produce identical outputs
pub struct AllocationUtil;

impl AllocationUtil {
    /// Split `total` into `count` shares that are as equal as possible.
    ///
    /// # Errors
    ///
    /// Returns `CalcError::DivisionByZero` when `count` is zero and
    /// `CalcError::RedistributionLimitExceeded` when `total` has more
    /// fractional digits than `scale` allows.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tally_core::{AllocationUtil, RoundingMode};
    ///
    /// // 10 / 3 = [3.34, 3.33, 3.33], sum = 10.00
    /// let shares = AllocationUtil::distribute(dec!(10), 3, 2, RoundingMode::HalfEven).unwrap();
    /// assert_eq!(shares, vec![dec!(3.34), dec!(3.33), dec!(3.33)]);
    /// ```
    pub fn distribute(
        total: Decimal,
        count: usize,
        scale: u32,
        mode: RoundingMode,
    ) -> CalcResult<Vec<Decimal>> {
        let exact_share = decimal::divide_for_scale(total, Decimal::from(count), scale)?;
        let mut shares = vec![RoundingService::round(exact_share, scale, mode); count];
        Self::redistribute_residual(total, &mut shares, &vec![true; count], scale)?;
        Ok(shares)
    }

    /// Split `total` proportionally to `weights`.
    ///
    /// `share[i] = total * weights[i] / sum(weights)`, rounded, then
    /// reconciled against `total`.
    ///
    /// # Errors
    ///
    /// Returns `CalcError::InvalidWeights` for a negative weight and
    /// `CalcError::DivisionByZero` when the weights sum to zero.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tally_core::{AllocationUtil, RoundingMode};
    ///
    /// let weights = [dec!(3), dec!(2), dec!(1)];
    /// let shares = AllocationUtil::allocate(dec!(1000), &weights, 2, RoundingMode::HalfEven).unwrap();
    /// assert_eq!(shares.iter().sum::<rust_decimal::Decimal>(), dec!(1000));
    /// ```
    pub fn allocate(
        total: Decimal,
        weights: &[Decimal],
        scale: u32,
        mode: RoundingMode,
    ) -> CalcResult<Vec<Decimal>> {
        if let Some((index, weight)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_zero() && w.is_sign_negative())
        {
            return Err(CalcError::InvalidWeights(format!(
                "weight {weight} at index {index} is negative"
            )));
        }

        let weight_sum = weights
            .iter()
            .try_fold(Decimal::ZERO, |acc, w| decimal::checked_add(acc, *w))?;
        if weight_sum.is_zero() {
            return Err(CalcError::DivisionByZero);
        }

        let mut shares = weights
            .iter()
            .map(|weight| {
                let numerator = decimal::checked_mul(total, *weight)?;
                let exact = decimal::divide_for_scale(numerator, weight_sum, scale)?;
                Ok(RoundingService::round(exact, scale, mode))
            })
            .collect::<CalcResult<Vec<_>>>()?;

        let eligible: Vec<bool> = weights.iter().map(|w| !w.is_zero()).collect();
        Self::redistribute_residual(total, &mut shares, &eligible, scale)?;
        Ok(shares)
    }

    /// Currency-aware [`Self::distribute`].
    pub fn distribute_money(money: &Money, count: usize) -> CalcResult<Vec<Money>> {
        let currency = CurrencyRegistry::global().resolve(&money.currency);
        let shares = Self::distribute(money.amount, count, currency.scale, currency.rounding_mode)?;
        Ok(shares
            .into_iter()
            .map(|amount| Money::new(amount, &money.currency))
            .collect())
    }

    /// Currency-aware [`Self::allocate`].
    pub fn allocate_money(money: &Money, weights: &[Decimal]) -> CalcResult<Vec<Money>> {
        let currency = CurrencyRegistry::global().resolve(&money.currency);
        let shares = Self::allocate(money.amount, weights, currency.scale, currency.rounding_mode)?;
        Ok(shares
            .into_iter()
            .map(|amount| Money::new(amount, &money.currency))
            .collect())
    }

    /// Moves `total - sum(shares)` into the shares one minor unit at a time.
    ///
    /// Only indices marked in `eligible` receive units, and a step is skipped
    /// when it would give a share the opposite sign of `total`.
    fn redistribute_residual(
        total: Decimal,
        shares: &mut [Decimal],
        eligible: &[bool],
        scale: u32,
    ) -> CalcResult<()> {
        let allocated = shares
            .iter()
            .try_fold(Decimal::ZERO, |acc, s| decimal::checked_add(acc, *s))?;
        let mut residual = decimal::checked_sub(total, allocated)?;
        if residual.is_zero() {
            return Ok(());
        }

        tracing::debug!(
            %total,
            %residual,
            shares = shares.len(),
            "Redistributing rounding residual"
        );

        let unit = RoundingService::minor_unit(scale);
        let limit = REDISTRIBUTION_FACTOR * shares.len();
        let mut visits = 0usize;
        let mut index = 0usize;

        while !residual.is_zero() {
            if visits >= limit {
                tracing::error!(
                    %total,
                    %residual,
                    scale,
                    visits,
                    "Residual redistribution did not converge; total is finer than the target scale"
                );
                return Err(CalcError::RedistributionLimitExceeded {
                    iterations: visits,
                    residual,
                });
            }

            let step = if residual.is_sign_negative() { -unit } else { unit };
            let candidate = shares[index] + step;
            if eligible[index] && !Self::crosses_sign(candidate, total) {
                shares[index] = candidate;
                residual -= step;
            }
            visits += 1;
            index = (index + 1) % shares.len();
        }

        Ok(())
    }

    /// True if `share` is nonzero with the opposite sign of `total`.
    fn crosses_sign(share: Decimal, total: Decimal) -> bool {
        !share.is_zero() && !total.is_zero() && share.is_sign_negative() != total.is_sign_negative()
    }
}
