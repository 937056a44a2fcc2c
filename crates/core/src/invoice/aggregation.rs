//! Invoice aggregation and integrity verification.

use rust_decimal::Decimal;

use super::types::{IntegrityIssue, IntegrityReport, InvoiceAggregation, LineItemResult};
use crate::currency::CurrencyRegistry;
use crate::decimal;
use crate::rounding::RoundingService;
use tally_shared::types::money::normalize_code;
use tally_shared::{CalcError, CalcResult};

/// Invoice-level calculation service.
pub struct InvoiceService;

impl InvoiceService {
    /// Aggregates line items into invoice totals.
    ///
    /// The grand total is the sum of the displayed line totals. Any
    /// difference between it and the rounded column totals is folded into
    /// `total_adjustment`. An empty slice yields zero totals in the default
    /// currency.
    ///
    /// # Errors
    ///
    /// Returns `CalcError::CurrencyMismatch` if the items do not share a
    /// currency.
    pub fn aggregate_line_items(items: &[LineItemResult]) -> CalcResult<InvoiceAggregation> {
        let registry = CurrencyRegistry::global();
        let code = items
            .first()
            .map_or_else(|| registry.default_currency().to_string(), |item| item.currency.clone());
        let currency = registry.resolve(&code);

        if let Some(foreign) = items
            .iter()
            .find(|item| normalize_code(&item.currency) != currency.code)
        {
            return Err(CalcError::CurrencyMismatch {
                expected: currency.code,
                got: foreign.currency.clone(),
            });
        }

        let round = |value: Decimal| RoundingService::round_for(value, &currency);

        let mut taxable_sum = Decimal::ZERO;
        let mut tax_sum = Decimal::ZERO;
        let mut grand_total = Decimal::ZERO;
        for item in items {
            taxable_sum = decimal::checked_add(taxable_sum, item.calculated.taxable_amount)?;
            tax_sum = decimal::checked_add(tax_sum, item.calculated.tax_amount)?;
            grand_total = decimal::checked_add(grand_total, item.calculated.total)?;
        }

        let total_taxable = round(taxable_sum);
        let total_tax = round(tax_sum);
        let total_before_adjustment = round(decimal::checked_add(total_taxable, total_tax)?);
        let grand_total = round(grand_total);
        let total_adjustment = decimal::checked_sub(grand_total, total_before_adjustment)?;

        tracing::debug!(
            currency = %currency.code,
            items = items.len(),
            grand_total = %grand_total,
            total_adjustment = %total_adjustment,
            "Aggregated invoice"
        );

        Ok(InvoiceAggregation {
            total_taxable,
            total_tax,
            total_before_adjustment,
            total_adjustment,
            grand_total,
            items: items.to_vec(),
            currency: currency.code,
            scale: currency.scale,
        })
    }

    /// Checks an aggregated invoice for internal consistency.
    ///
    /// Collects every violation instead of stopping at the first one. Sums
    /// that overflow are reported as issues and continue saturated.
    #[must_use]
    pub fn verify_invoice_integrity(invoice: &InvoiceAggregation) -> IntegrityReport {
        let mut errors = Vec::new();
        let mut line_sum = Decimal::ZERO;

        for (index, item) in invoice.items.iter().enumerate() {
            if normalize_code(&item.currency) != normalize_code(&invoice.currency) {
                errors.push(IntegrityIssue::CurrencyMismatch {
                    index,
                    expected: invoice.currency.clone(),
                    got: item.currency.clone(),
                });
            }

            match item.footed_total() {
                Ok(expected) if expected != item.calculated.total => {
                    errors.push(IntegrityIssue::LineTotalMismatch {
                        index,
                        expected,
                        actual: item.calculated.total,
                    });
                }
                Ok(_) => {}
                Err(_) => errors.push(IntegrityIssue::Overflow {
                    context: format!("line {index} taxable + tax + adjustment"),
                }),
            }

            line_sum = Self::add_or_record(
                &mut errors,
                line_sum,
                item.calculated.total,
                "sum of line totals",
            );
        }

        if line_sum != invoice.grand_total {
            errors.push(IntegrityIssue::GrandTotalMismatch {
                expected: line_sum,
                actual: invoice.grand_total,
            });
        }

        let subtotal = Self::add_or_record(
            &mut errors,
            invoice.total_taxable,
            invoice.total_tax,
            "invoice footing",
        );
        let footed =
            Self::add_or_record(&mut errors, subtotal, invoice.total_adjustment, "invoice footing");
        if footed != invoice.grand_total {
            errors.push(IntegrityIssue::FootingMismatch {
                expected: footed,
                actual: invoice.grand_total,
            });
        }

        let discrepancy = decimal::checked_sub(invoice.grand_total, line_sum).unwrap_or_else(|_| {
            errors.push(IntegrityIssue::Overflow {
                context: "discrepancy".to_string(),
            });
            invoice.grand_total.saturating_sub(line_sum)
        });
        for issue in &errors {
            tracing::warn!(currency = %invoice.currency, "Invoice integrity check failed: {issue}");
        }

        IntegrityReport { errors, discrepancy }
    }

    fn add_or_record(
        errors: &mut Vec<IntegrityIssue>,
        a: Decimal,
        b: Decimal,
        context: &str,
    ) -> Decimal {
        decimal::checked_add(a, b).unwrap_or_else(|_| {
            errors.push(IntegrityIssue::Overflow {
                context: context.to_string(),
            });
            a.saturating_add(b)
        })
    }
}
