//! Invoice domain types.
//!
//! Inputs are sanitised before use, results carry the sanitised input and the
//! audit trail of any rounding adjustment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decimal;
use crate::rounding::RoundingAdjustment;
use tally_shared::CalcResult;

/// Line-item field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemField {
    /// Price of one unit.
    UnitPrice,
    /// Number of units.
    Quantity,
    /// Flat discount on the gross amount.
    DiscountAmount,
    /// Tax percentage.
    TaxRate,
    /// User-entered line total.
    Total,
}

impl std::fmt::Display for LineItemField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnitPrice => write!(f, "unit_price"),
            Self::Quantity => write!(f, "quantity"),
            Self::DiscountAmount => write!(f, "discount_amount"),
            Self::TaxRate => write!(f, "tax_rate"),
            Self::Total => write!(f, "total"),
        }
    }
}

/// A value that was corrected during sanitisation.
///
/// These are non-fatal: the calculation proceeds with `corrected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Field that was corrected.
    pub field: LineItemField,
    /// Human readable description.
    pub message: String,
    /// Value supplied by the caller.
    pub original: Decimal,
    /// Value used for the calculation.
    pub corrected: Decimal,
}

/// Input for a line item computed forward from its unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemInput {
    /// Price of one unit, must be >= 0.
    pub unit_price: Decimal,
    /// Whole number of units, must be >= 1.
    pub quantity: Decimal,
    /// Flat discount on the gross amount, must be >= 0.
    pub discount_amount: Decimal,
    /// Tax percentage in [0, 100].
    pub tax_rate: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
}

impl LineItemInput {
    /// Creates an input with no discount and no tax.
    #[must_use]
    pub fn new(unit_price: Decimal, quantity: Decimal, currency: &str) -> Self {
        Self {
            unit_price,
            quantity,
            discount_amount: Decimal::ZERO,
            tax_rate: Decimal::ZERO,
            currency: currency.to_string(),
        }
    }

    /// Sets the discount amount.
    #[must_use]
    pub fn with_discount(mut self, discount_amount: Decimal) -> Self {
        self.discount_amount = discount_amount;
        self
    }

    /// Sets the tax rate (percent).
    #[must_use]
    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self
    }
}

/// Input for a line item solved backward from a user-entered total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnteredTotalInput {
    /// Total including tax as entered by the user, must be >= 0.
    pub total: Decimal,
    /// Whole number of units, must be >= 1.
    pub quantity: Decimal,
    /// Flat discount on the gross amount, must be >= 0.
    pub discount_amount: Decimal,
    /// Tax percentage in [0, 100].
    pub tax_rate: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
}

impl EnteredTotalInput {
    /// Creates an input with no discount and no tax.
    #[must_use]
    pub fn new(total: Decimal, quantity: Decimal, currency: &str) -> Self {
        Self {
            total,
            quantity,
            discount_amount: Decimal::ZERO,
            tax_rate: Decimal::ZERO,
            currency: currency.to_string(),
        }
    }

    /// Sets the discount amount.
    #[must_use]
    pub fn with_discount(mut self, discount_amount: Decimal) -> Self {
        self.discount_amount = discount_amount;
        self
    }

    /// Sets the tax rate (percent).
    #[must_use]
    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self
    }
}

/// How a line item was calculated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMode {
    /// Forward from unit price.
    Derived,
    /// Backward from an entered total.
    EnteredTotal,
}

/// Calculated amounts of a line item, all at currency scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAmounts {
    /// `unit_price * quantity`.
    pub gross_amount: Decimal,
    /// Discount actually applied (never more than gross).
    pub discount_amount: Decimal,
    /// `gross_amount - discount_amount`.
    pub taxable_amount: Decimal,
    /// `taxable_amount * tax_rate / 100`.
    pub tax_amount: Decimal,
    /// Displayed line total.
    pub total: Decimal,
}

/// Result of a line-item calculation.
///
/// Invariant: `total == taxable_amount + tax_amount + rounding_adjustment.adjustment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemResult {
    /// Sanitised input. In entered-total mode `unit_price` is the displayed price.
    pub input: LineItemInput,
    /// Calculated amounts.
    pub calculated: LineAmounts,
    /// Reconciliation between the recomputed and the displayed total.
    pub rounding_adjustment: RoundingAdjustment,
    /// Currency code of all amounts.
    pub currency: String,
    /// Currency scale used.
    pub scale: u32,
    /// Calculation direction.
    pub mode: CalculationMode,
    /// Unrounded implied unit price (entered-total mode only).
    pub exact_unit_price: Option<Decimal>,
    /// Corrections applied to the input.
    pub validation_errors: Vec<ValidationIssue>,
}

impl LineItemResult {
    /// Signed adjustment absorbed into the displayed total.
    #[must_use]
    pub fn adjustment(&self) -> Decimal {
        self.rounding_adjustment.adjustment
    }

    /// True if the displayed total differs from the recomputed one.
    #[must_use]
    pub fn has_adjustment(&self) -> bool {
        self.rounding_adjustment.has_adjustment
    }

    /// True if the input needed correcting.
    #[must_use]
    pub fn has_validation_errors(&self) -> bool {
        !self.validation_errors.is_empty()
    }

    /// `taxable + tax + adjustment`, which must equal the displayed total.
    ///
    /// # Errors
    ///
    /// Returns `CalcError::Overflow` if the sum cannot be represented.
    pub fn footed_total(&self) -> CalcResult<Decimal> {
        let subtotal =
            decimal::checked_add(self.calculated.taxable_amount, self.calculated.tax_amount)?;
        decimal::checked_add(subtotal, self.adjustment())
    }
}

/// Totals of an invoice built from line items.
///
/// Invariant: `grand_total == sum(items[i].calculated.total)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceAggregation {
    /// Sum of taxable amounts.
    pub total_taxable: Decimal,
    /// Sum of tax amounts.
    pub total_tax: Decimal,
    /// `total_taxable + total_tax`.
    pub total_before_adjustment: Decimal,
    /// `grand_total - total_before_adjustment`.
    pub total_adjustment: Decimal,
    /// Sum of the displayed line totals.
    pub grand_total: Decimal,
    /// The aggregated line items.
    pub items: Vec<LineItemResult>,
    /// Currency code of all amounts.
    pub currency: String,
    /// Currency scale used.
    pub scale: u32,
}

/// A single integrity violation found on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// A line total does not equal taxable + tax + adjustment.
    #[error("Line {index}: total {actual} != taxable + tax + adjustment {expected}")]
    LineTotalMismatch {
        /// Position of the line item.
        index: usize,
        /// `taxable + tax + adjustment`.
        expected: Decimal,
        /// Stored total.
        actual: Decimal,
    },

    /// The grand total does not equal the sum of line totals.
    #[error("Grand total {actual} != sum of line totals {expected}")]
    GrandTotalMismatch {
        /// Sum of line totals.
        expected: Decimal,
        /// Stored grand total.
        actual: Decimal,
    },

    /// The column totals do not foot to the grand total.
    #[error("Taxable + tax + adjustment {expected} != grand total {actual}")]
    FootingMismatch {
        /// `total_taxable + total_tax + total_adjustment`.
        expected: Decimal,
        /// Stored grand total.
        actual: Decimal,
    },

    /// A check could not be evaluated because the amounts overflow.
    #[error("Amounts too large to verify: {context}")]
    Overflow {
        /// Which sum overflowed.
        context: String,
    },

    /// A line is in a different currency than the invoice.
    #[error("Line {index}: currency {got} != invoice currency {expected}")]
    CurrencyMismatch {
        /// Position of the line item.
        index: usize,
        /// Invoice currency.
        expected: String,
        /// Line currency.
        got: String,
    },
}

/// Outcome of an integrity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// Every violation found; empty means the invoice is consistent.
    pub errors: Vec<IntegrityIssue>,
    /// `grand_total - sum(line totals)`.
    pub discrepancy: Decimal,
}

impl IntegrityReport {
    /// True if no violations were found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Whether a supply is taxed as CGST + SGST or as IGST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyType {
    /// Within one state: central and state halves.
    IntraState,
    /// Across states: a single integrated tax.
    InterState,
}

/// GST computed on a taxable amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstBreakdown {
    /// Intra- or inter-state supply.
    pub supply_type: SupplyType,
    /// Amount the tax is levied on.
    pub taxable_amount: Decimal,
    /// Combined rate in percent.
    pub rate: Decimal,
    /// Central GST (intra-state only).
    pub cgst: Decimal,
    /// State GST (intra-state only).
    pub sgst: Decimal,
    /// Integrated GST (inter-state only).
    pub igst: Decimal,
    /// `cgst + sgst + igst`.
    pub total_tax: Decimal,
    /// Tax at the full rate, rounded once.
    pub combined_tax: Decimal,
    /// `total_tax - combined_tax`; nonzero when the halves round apart.
    pub mismatch: Decimal,
}

/// A tax amount split into central and state halves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSplit {
    /// Amount being split.
    pub total_tax: Decimal,
    /// Half of the tax, rounded.
    pub cgst: Decimal,
    /// Remainder, `total_tax - cgst`.
    pub sgst: Decimal,
}
