//! Checked decimal operations.
//!
//! `rust_decimal` already provides exact add/subtract/multiply and total
//! comparison. This module adds the parts of the arithmetic contract the
//! engine depends on: division with an explicit precision that fails on a
//! zero divisor, overflow reported as an error, and string parsing.

use std::cmp::Ordering;

use rust_decimal::{Decimal, RoundingStrategy};
use tally_shared::config::MAX_SCALE;
use tally_shared::{CalcError, CalcResult};

/// Fractional digits kept by [`divide`] when no precision is given.
pub const DEFAULT_DIVISION_PRECISION: u32 = 20;

/// Divides `a` by `b`, truncating the quotient to `precision` fractional digits.
///
/// # Errors
///
/// Returns `CalcError::DivisionByZero` when `b` is zero and
/// `CalcError::Overflow` when the quotient cannot be represented.
pub fn divide(a: Decimal, b: Decimal, precision: u32) -> CalcResult<Decimal> {
    if b.is_zero() {
        return Err(CalcError::DivisionByZero);
    }
    let quotient = a
        .checked_div(b)
        .ok_or_else(|| CalcError::Overflow(format!("{a} / {b}")))?;
    Ok(quotient.round_dp_with_strategy(precision.min(MAX_SCALE), RoundingStrategy::ToZero))
}

/// Divides with [`DEFAULT_DIVISION_PRECISION`].
///
/// # Errors
///
/// See [`divide`].
pub fn divide_default(a: Decimal, b: Decimal) -> CalcResult<Decimal> {
    divide(a, b, DEFAULT_DIVISION_PRECISION)
}

/// Extra fractional digits kept beyond the target scale before rounding.
const SCALE_GUARD_DIGITS: u32 = 8;

/// Divides for a result that will be rounded to `scale`.
///
/// Keeps at least [`DEFAULT_DIVISION_PRECISION`] digits and always
/// [`SCALE_GUARD_DIGITS`] more than `scale`, up to the 28 `Decimal` supports.
///
/// # Errors
///
/// See [`divide`].
pub fn divide_for_scale(a: Decimal, b: Decimal, scale: u32) -> CalcResult<Decimal> {
    let precision = DEFAULT_DIVISION_PRECISION.max(scale.saturating_add(SCALE_GUARD_DIGITS));
    divide(a, b, precision.min(MAX_SCALE))
}

/// Multiplies exactly, reporting overflow as an error.
pub fn checked_mul(a: Decimal, b: Decimal) -> CalcResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| CalcError::Overflow(format!("{a} * {b}")))
}

/// Adds exactly, reporting overflow as an error.
pub fn checked_add(a: Decimal, b: Decimal) -> CalcResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| CalcError::Overflow(format!("{a} + {b}")))
}

/// Subtracts exactly, reporting overflow as an error.
pub fn checked_sub(a: Decimal, b: Decimal) -> CalcResult<Decimal> {
    a.checked_sub(b)
        .ok_or_else(|| CalcError::Overflow(format!("{a} - {b}")))
}

/// Three-way comparison returning `-1`, `0` or `1`.
#[must_use]
pub fn compare(a: Decimal, b: Decimal) -> i8 {
    match a.cmp(&b) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Parses a decimal string such as `"1,180.50"` or `" -2.5 "`.
///
/// Thousands separators are accepted; exponents and binary floats are not.
///
/// # Errors
///
/// Returns `CalcError::InvalidAmount` when the input is not a decimal number.
pub fn parse_decimal(input: &str) -> CalcResult<Decimal> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Err(CalcError::InvalidAmount(input.to_string()));
    }
    Decimal::from_str_exact(&cleaned).map_err(|_| CalcError::InvalidAmount(input.to_string()))
}

/// Returns the canonical string form: no trailing fractional zeros.
#[must_use]
pub fn to_canonical_string(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Parses a decimal string and returns its canonical form.
///
/// # Errors
///
/// See [`parse_decimal`].
pub fn parse_to_string(input: &str) -> CalcResult<String> {
    parse_decimal(input).map(to_canonical_string)
}

/// Returns `true` if `value` has no fractional part.
#[must_use]
pub fn is_whole(value: Decimal) -> bool {
    value.fract().is_zero()
}
