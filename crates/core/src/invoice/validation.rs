//! Line-item input sanitisation.
//!
//! Invalid values are clamped to the nearest valid value and reported as a
//! `ValidationIssue`; nothing is dropped and nothing aborts the calculation.

use rust_decimal::Decimal;

use super::types::{EnteredTotalInput, LineItemField, LineItemInput, ValidationIssue};

fn record(
    issues: &mut Vec<ValidationIssue>,
    field: LineItemField,
    message: &str,
    original: Decimal,
    corrected: Decimal,
) -> Decimal {
    issues.push(ValidationIssue {
        field,
        message: message.to_string(),
        original,
        corrected,
    });
    corrected
}

fn non_negative(issues: &mut Vec<ValidationIssue>, field: LineItemField, value: Decimal) -> Decimal {
    if value < Decimal::ZERO {
        record(issues, field, "must not be negative", value, Decimal::ZERO)
    } else {
        value
    }
}

fn tax_rate(issues: &mut Vec<ValidationIssue>, value: Decimal) -> Decimal {
    if value < Decimal::ZERO {
        record(issues, LineItemField::TaxRate, "must be at least 0", value, Decimal::ZERO)
    } else if value > Decimal::ONE_HUNDRED {
        record(
            issues,
            LineItemField::TaxRate,
            "must be at most 100",
            value,
            Decimal::ONE_HUNDRED,
        )
    } else {
        value
    }
}

fn quantity(issues: &mut Vec<ValidationIssue>, value: Decimal) -> Decimal {
    let corrected = value.floor().max(Decimal::ONE);
    if corrected == value {
        value
    } else if value < Decimal::ONE {
        record(issues, LineItemField::Quantity, "must be at least 1", value, corrected)
    } else {
        record(
            issues,
            LineItemField::Quantity,
            "must be a whole number",
            value,
            corrected,
        )
    }
}

/// Returns a corrected copy of `input` and the corrections made.
#[must_use]
pub fn sanitize_line_item(input: &LineItemInput) -> (LineItemInput, Vec<ValidationIssue>) {
    let mut issues = Vec::new();
    let sanitized = LineItemInput {
        unit_price: non_negative(&mut issues, LineItemField::UnitPrice, input.unit_price),
        quantity: quantity(&mut issues, input.quantity),
        discount_amount: non_negative(&mut issues, LineItemField::DiscountAmount, input.discount_amount),
        tax_rate: tax_rate(&mut issues, input.tax_rate),
        currency: input.currency.clone(),
    };
    (sanitized, issues)
}

/// Returns a corrected copy of `input` and the corrections made.
#[must_use]
pub fn sanitize_entered_total(input: &EnteredTotalInput) -> (EnteredTotalInput, Vec<ValidationIssue>) {
    let mut issues = Vec::new();
    let sanitized = EnteredTotalInput {
        total: non_negative(&mut issues, LineItemField::Total, input.total),
        quantity: quantity(&mut issues, input.quantity),
        discount_amount: non_negative(&mut issues, LineItemField::DiscountAmount, input.discount_amount),
        tax_rate: tax_rate(&mut issues, input.tax_rate),
        currency: input.currency.clone(),
    };
    (sanitized, issues)
}
