//! Invoice calculations: line items, GST, aggregation and integrity checks.

pub mod aggregation;
pub mod line_item;
pub mod tax;
pub mod types;
pub mod validation;

#[cfg(test)]
mod props;

pub use aggregation::InvoiceService;
pub use line_item::LineItemService;
pub use tax::TaxService;
pub use types::{
    CalculationMode, EnteredTotalInput, GstBreakdown, IntegrityIssue, IntegrityReport,
    InvoiceAggregation, LineAmounts, LineItemField, LineItemInput, LineItemResult, SupplyType,
    TaxSplit, ValidationIssue,
};
pub use validation::{sanitize_entered_total, sanitize_line_item};
