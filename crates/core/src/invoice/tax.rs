//! GST helpers.
//!
//! Intra-state supply is taxed as two halves (CGST + SGST), inter-state supply
//! as a single IGST component.

use rust_decimal::Decimal;

use super::types::{GstBreakdown, SupplyType, TaxSplit};
use crate::currency::{CurrencyConfig, CurrencyRegistry};
use crate::decimal;
use crate::rounding::RoundingService;
use tally_shared::CalcResult;

/// Tax calculation service.
pub struct TaxService;

impl TaxService {
    /// Intra-state GST: CGST and SGST at half the rate, each rounded on its own.
    ///
    /// Rounding the halves independently can make `total_tax` differ from
    /// tax at the full rate by one minor unit; that difference is reported in
    /// `mismatch`.
    pub fn calculate_gst(taxable: Decimal, rate: Decimal, currency: &str) -> CalcResult<GstBreakdown> {
        let config = CurrencyRegistry::global().resolve(currency);
        let half_rate = decimal::divide_default(rate, Decimal::TWO)?;

        let cgst = Self::tax_at(taxable, half_rate, &config)?;
        let sgst = Self::tax_at(taxable, half_rate, &config)?;
        let total_tax = decimal::checked_add(cgst, sgst)?;
        let combined_tax = Self::tax_at(taxable, rate, &config)?;
        let mismatch = total_tax - combined_tax;

        if !mismatch.is_zero() {
            tracing::debug!(
                currency = %config.code,
                taxable = %taxable,
                rate = %rate,
                mismatch = %mismatch,
                "CGST/SGST halves differ from combined tax"
            );
        }

        Ok(GstBreakdown {
            supply_type: SupplyType::IntraState,
            taxable_amount: taxable,
            rate,
            cgst,
            sgst,
            igst: Decimal::ZERO,
            total_tax,
            combined_tax,
            mismatch,
        })
    }

    /// Inter-state GST: a single IGST component at the full rate.
    pub fn calculate_igst(taxable: Decimal, rate: Decimal, currency: &str) -> CalcResult<GstBreakdown> {
        let config = CurrencyRegistry::global().resolve(currency);
        let igst = Self::tax_at(taxable, rate, &config)?;

        Ok(GstBreakdown {
            supply_type: SupplyType::InterState,
            taxable_amount: taxable,
            rate,
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
            igst,
            total_tax: igst,
            combined_tax: igst,
            mismatch: Decimal::ZERO,
        })
    }

    /// Splits an already computed tax into CGST and SGST.
    ///
    /// `cgst = round(tax / 2)` and SGST takes the remainder, so
    /// `cgst + sgst == tax` always holds.
    pub fn split_tax_cgst_sgst(total_tax: Decimal, currency: &str) -> CalcResult<TaxSplit> {
        let config = CurrencyRegistry::global().resolve(currency);
        let cgst = RoundingService::round_for(
            decimal::divide_for_scale(total_tax, Decimal::TWO, config.scale)?,
            &config,
        );
        let sgst = decimal::checked_sub(total_tax, cgst)?;
        Ok(TaxSplit { total_tax, cgst, sgst })
    }

    /// Tax contained in a tax-inclusive amount.
    ///
    /// `amount - round(amount / (1 + rate / 100))`
    pub fn extract_inclusive_tax(amount: Decimal, rate: Decimal, currency: &str) -> CalcResult<Decimal> {
        let config = CurrencyRegistry::global().resolve(currency);
        let amount = RoundingService::round_for(amount, &config);
        let factor = Decimal::ONE + decimal::divide_default(rate, Decimal::ONE_HUNDRED)?;
        let net = RoundingService::round_for(decimal::divide_for_scale(amount, factor, config.scale)?, &config);
        decimal::checked_sub(amount, net)
    }

    fn tax_at(taxable: Decimal, rate: Decimal, config: &CurrencyConfig) -> CalcResult<Decimal> {
        let raw = decimal::divide_for_scale(
            decimal::checked_mul(taxable, rate)?,
            Decimal::ONE_HUNDRED,
            config.scale,
        )?;
        Ok(RoundingService::round_for(raw, config))
    }
}
