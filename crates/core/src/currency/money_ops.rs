//! Arithmetic on currency-scoped money values.
//!
//! Addition and subtraction are exact and refuse to mix currencies.
//! Multiplication and division round the result to the currency's scale
//! using its registered rounding mode.

use rust_decimal::Decimal;
use tally_shared::{CalcError, CalcResult, Money};

use crate::currency::CurrencyRegistry;
use crate::decimal;
use crate::rounding::RoundingService;

fn ensure_same_currency(left: &Money, right: &Money) -> CalcResult<()> {
    if left.same_currency(right) {
        Ok(())
    } else {
        Err(CalcError::CurrencyMismatch {
            expected: left.currency.clone(),
            got: right.currency.clone(),
        })
    }
}

/// Adds two amounts of the same currency.
///
/// # Errors
///
/// Returns `CalcError::CurrencyMismatch` when the currencies differ.
pub fn add_money(left: &Money, right: &Money) -> CalcResult<Money> {
    ensure_same_currency(left, right)?;
    let amount = decimal::checked_add(left.amount, right.amount)?;
    Ok(Money::new(amount, &left.currency))
}

/// Subtracts `right` from `left`.
///
/// # Errors
///
/// Returns `CalcError::CurrencyMismatch` when the currencies differ.
pub fn subtract_money(left: &Money, right: &Money) -> CalcResult<Money> {
    ensure_same_currency(left, right)?;
    let amount = decimal::checked_sub(left.amount, right.amount)?;
    Ok(Money::new(amount, &left.currency))
}

/// Multiplies by a factor and rounds to the currency's scale.
pub fn multiply_money(money: &Money, factor: Decimal) -> CalcResult<Money> {
    let product = decimal::checked_mul(money.amount, factor)?;
    Ok(Money::new(
        RoundingService::round_for_currency(product, &money.currency),
        &money.currency,
    ))
}

/// Divides by `divisor` and rounds to the currency's scale.
///
/// # Errors
///
/// Returns `CalcError::DivisionByZero` when `divisor` is zero.
pub fn divide_money(money: &Money, divisor: Decimal) -> CalcResult<Money> {
    let currency = CurrencyRegistry::global().resolve(&money.currency);
    let quotient = decimal::divide_for_scale(money.amount, divisor, currency.scale)?;
    Ok(Money::new(
        RoundingService::round_for(quotient, &currency),
        &money.currency,
    ))
}

/// Sums amounts that must all be in `currency`.
///
/// # Errors
///
/// Returns `CalcError::CurrencyMismatch` on the first foreign amount.
pub fn sum_money<'a, I>(items: I, currency: &str) -> CalcResult<Money>
where
    I: IntoIterator<Item = &'a Money>,
{
    items
        .into_iter()
        .try_fold(Money::zero(currency), |acc, item| add_money(&acc, item))
}
