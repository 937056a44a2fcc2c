//! Line-item engine.
//!
//! Two directions:
//! - Derived: forward from unit price, quantity, discount and tax rate
//! - Entered total: backward from a user-entered total to an implied unit
//!   price, then forward again, reconciling drift into an adjustment
//!
//! Every intermediate amount is rounded to the currency scale before the next
//! step consumes it.

use rust_decimal::Decimal;

use super::types::{
    CalculationMode, EnteredTotalInput, LineAmounts, LineItemField, LineItemInput,
    LineItemResult, ValidationIssue,
};
use super::validation::{sanitize_entered_total, sanitize_line_item};
use crate::currency::{CurrencyConfig, CurrencyRegistry};
use crate::decimal;
use crate::rounding::{RoundingAdjustment, RoundingService};
use tally_shared::CalcResult;

/// Line-item calculation service.
pub struct LineItemService;

impl LineItemService {
    /// Calculate a line item forward from its unit price.
    ///
    /// 1. gross = round(unit_price * quantity)
    /// 2. discount = min(discount, gross)
    /// 3. taxable = round(gross - discount)
    /// 4. tax = round(taxable * tax_rate / 100)
    /// 5. total = round(taxable + tax)
    ///
    /// The rounding adjustment is always zero in this mode.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tally_core::invoice::{LineItemInput, LineItemService};
    ///
    /// let input = LineItemInput::new(dec!(1000), dec!(2), "INR").with_tax_rate(dec!(18));
    /// let result = LineItemService::calculate(&input).unwrap();
    /// assert_eq!(result.calculated.total, dec!(2360.00));
    /// assert!(!result.has_adjustment());
    /// ```
    pub fn calculate(input: &LineItemInput) -> CalcResult<LineItemResult> {
        let (input, issues) = sanitize_line_item(input);
        Self::log_issues(&issues);

        let currency = CurrencyRegistry::global().resolve(&input.currency);
        let calculated = Self::derive_amounts(&input, &currency)?;
        let rounding_adjustment =
            RoundingAdjustment::none(calculated.total, currency.scale, currency.rounding_mode);

        Ok(LineItemResult {
            input,
            calculated,
            rounding_adjustment,
            currency: currency.code,
            scale: currency.scale,
            mode: CalculationMode::Derived,
            exact_unit_price: None,
            validation_errors: issues,
        })
    }

    /// Calculate a line item backward from a user-entered total.
    ///
    /// 1. taxable = round(total / (1 + tax_rate / 100))
    /// 2. gross = round(taxable + discount)
    /// 3. exact unit price = gross / quantity at extended precision
    /// 4. displayed unit price = round(exact unit price)
    /// 5. recompute forward from the displayed unit price
    /// 6. adjustment = entered total - recomputed total
    ///
    /// The returned total is the entered total; the adjustment records the
    /// difference to what the displayed unit price actually produces.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tally_core::invoice::{EnteredTotalInput, LineItemService};
    ///
    /// let input = EnteredTotalInput::new(dec!(1180), dec!(1), "INR").with_tax_rate(dec!(18));
    /// let result = LineItemService::calculate_from_total(&input).unwrap();
    /// assert_eq!(result.calculated.taxable_amount, dec!(1000.00));
    /// assert_eq!(result.calculated.tax_amount, dec!(180.00));
    /// assert!(!result.has_adjustment());
    /// ```
    pub fn calculate_from_total(input: &EnteredTotalInput) -> CalcResult<LineItemResult> {
        let (input, mut issues) = sanitize_entered_total(input);

        let currency = CurrencyRegistry::global().resolve(&input.currency);
        let round = |value: Decimal| RoundingService::round_for(value, &currency);

        let entered_total = round(input.total);
        if entered_total != input.total {
            issues.push(ValidationIssue {
                field: LineItemField::Total,
                message: format!("rounded to {} decimal places", currency.scale),
                original: input.total,
                corrected: entered_total,
            });
        }
        Self::log_issues(&issues);

        let tax_factor = Decimal::ONE + decimal::divide_default(input.tax_rate, Decimal::ONE_HUNDRED)?;
        let taxable = round(decimal::divide_for_scale(entered_total, tax_factor, currency.scale)?);
        let gross = round(decimal::checked_add(taxable, input.discount_amount)?);
        let exact_unit_price = decimal::divide_for_scale(gross, input.quantity, currency.scale)?;
        let displayed_unit_price = round(exact_unit_price);

        let derived_input = LineItemInput {
            unit_price: displayed_unit_price,
            quantity: input.quantity,
            discount_amount: input.discount_amount,
            tax_rate: input.tax_rate,
            currency: currency.code.clone(),
        };
        let mut calculated = Self::derive_amounts(&derived_input, &currency)?;

        let rounding_adjustment = RoundingAdjustment::new(
            calculated.total,
            entered_total,
            currency.scale,
            currency.rounding_mode,
        );
        if rounding_adjustment.has_adjustment {
            tracing::debug!(
                currency = %currency.code,
                entered_total = %entered_total,
                recomputed_total = %calculated.total,
                adjustment = %rounding_adjustment.adjustment,
                unit_price = %displayed_unit_price,
                "Entered total differs from recomputed total"
            );
        }
        calculated.total = entered_total;

        Ok(LineItemResult {
            input: derived_input,
            calculated,
            rounding_adjustment,
            currency: currency.code,
            scale: currency.scale,
            mode: CalculationMode::EnteredTotal,
            exact_unit_price: Some(exact_unit_price),
            validation_errors: issues,
        })
    }

    fn derive_amounts(input: &LineItemInput, currency: &CurrencyConfig) -> CalcResult<LineAmounts> {
        let round = |value: Decimal| RoundingService::round_for(value, currency);

        let gross_amount = round(decimal::checked_mul(input.unit_price, input.quantity)?);
        let effective_discount = input.discount_amount.min(gross_amount);
        let taxable_amount = round(decimal::checked_sub(gross_amount, effective_discount)?);
        let tax_amount = round(decimal::divide_for_scale(
            decimal::checked_mul(taxable_amount, input.tax_rate)?,
            Decimal::ONE_HUNDRED,
            currency.scale,
        )?);
        let total = round(decimal::checked_add(taxable_amount, tax_amount)?);

        Ok(LineAmounts {
            gross_amount,
            discount_amount: round(gross_amount - taxable_amount),
            taxable_amount,
            tax_amount,
            total,
        })
    }

    fn log_issues(issues: &[ValidationIssue]) {
        for issue in issues {
            tracing::warn!(
                field = %issue.field,
                original = %issue.original,
                corrected = %issue.corrected,
                "Line item input corrected: {}",
                issue.message
            );
        }
    }
}
