//! Property-based tests for invoice calculations.
//!
//! - Every line foots: taxable + tax + adjustment == total
//! - Entered-total lines display exactly the entered total
//! - Aggregated invoices pass their own integrity check
//! - CGST + SGST always equals the split tax

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::aggregation::InvoiceService;
use super::line_item::LineItemService;
use super::tax::TaxService;
use super::types::{EnteredTotalInput, LineItemInput, LineItemResult};
use crate::rounding::RoundingService;
use tally_shared::RoundingMode;

/// Strategy to generate amounts in paise (0 to 1,000,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000).prop_map(|v| Decimal::new(v, 2))
}

/// Strategy to generate quantities (1 to 50).
fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..=50).prop_map(Decimal::from)
}

/// Strategy to generate tax rates: the common GST slabs or any rate in [0, 100].
fn tax_rate() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        prop::sample::select(vec![0i64, 5, 12, 18, 28]).prop_map(Decimal::from),
        (0i64..=10_000).prop_map(|v| Decimal::new(v, 2)),
    ]
}

/// Strategy to pick a currency with a non-default scale now and then.
fn currency() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["INR", "USD", "JPY", "KWD"])
}

fn derived_line() -> impl Strategy<Value = LineItemResult> {
    (amount(), quantity(), amount(), tax_rate()).prop_map(|(price, qty, discount, rate)| {
        let input = LineItemInput::new(price, qty, "INR")
            .with_discount(discount)
            .with_tax_rate(rate);
        LineItemService::calculate(&input).unwrap()
    })
}

fn entered_line() -> impl Strategy<Value = LineItemResult> {
    (amount(), quantity(), tax_rate()).prop_map(|(total, qty, rate)| {
        let input = EnteredTotalInput::new(total, qty, "INR").with_tax_rate(rate);
        LineItemService::calculate_from_total(&input).unwrap()
    })
}

fn any_line() -> impl Strategy<Value = LineItemResult> {
    prop_oneof![derived_line(), entered_line()]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Derived lines foot with a zero adjustment.
    #[test]
    fn prop_derived_line_foots(
        price in amount(),
        qty in quantity(),
        discount in amount(),
        rate in tax_rate(),
        code in currency(),
    ) {
        let input = LineItemInput::new(price, qty, code)
            .with_discount(discount)
            .with_tax_rate(rate);
        let result = LineItemService::calculate(&input).unwrap();

        prop_assert!(!result.has_adjustment());
        prop_assert_eq!(result.footed_total().unwrap(), result.calculated.total);
        prop_assert!(result.calculated.taxable_amount >= Decimal::ZERO);
        prop_assert!(result.calculated.discount_amount <= result.calculated.gross_amount);
    }

    /// Entered-total lines keep the entered total and foot through the adjustment.
    #[test]
    fn prop_entered_total_is_preserved(
        total in amount(),
        qty in quantity(),
        rate in tax_rate(),
        code in currency(),
    ) {
        let input = EnteredTotalInput::new(total, qty, code).with_tax_rate(rate);
        let result = LineItemService::calculate_from_total(&input).unwrap();

        let expected = RoundingService::round(total, result.scale, RoundingMode::HalfEven);
        prop_assert_eq!(result.calculated.total, expected);
        prop_assert_eq!(result.footed_total().unwrap(), result.calculated.total);
        prop_assert_eq!(
            result.adjustment(),
            result.rounding_adjustment.rounded - result.rounding_adjustment.original
        );
    }

    /// The grand total is the sum of line totals and the invoice is consistent.
    #[test]
    fn prop_aggregation_is_consistent(
        items in prop::collection::vec(any_line(), 0..12),
    ) {
        let invoice = InvoiceService::aggregate_line_items(&items).unwrap();
        let line_sum: Decimal = items.iter().map(|i| i.calculated.total).sum();

        prop_assert_eq!(invoice.grand_total, line_sum);
        prop_assert_eq!(
            invoice.total_before_adjustment + invoice.total_adjustment,
            invoice.grand_total
        );

        let report = InvoiceService::verify_invoice_integrity(&invoice);
        prop_assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
        prop_assert!(report.discrepancy.is_zero());
    }

    /// CGST and SGST always add back to the split tax.
    #[test]
    fn prop_split_is_exact(tax in amount(), code in currency()) {
        let split = TaxService::split_tax_cgst_sgst(tax, code).unwrap();
        prop_assert_eq!(split.cgst + split.sgst, tax);
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// Specific example: a 5000 total over 3 units back-solves to 1412.43
    /// exactly, so the displayed total needs no adjustment.
    #[test]
    fn test_entered_5000_by_3() {
        let input = EnteredTotalInput::new(dec!(5000), dec!(3), "INR").with_tax_rate(dec!(18));
        let result = LineItemService::calculate_from_total(&input).unwrap();
        assert_eq!(result.input.unit_price, dec!(1412.43));
        assert_eq!(result.calculated.total, dec!(5000.00));
        assert!(!result.has_adjustment());
        assert!(result.adjustment().is_zero());
        assert_eq!(result.footed_total().unwrap(), dec!(5000.00));
    }
}
