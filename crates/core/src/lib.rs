//! Core calculation logic for Tally.
//!
//! This crate contains pure computation with ZERO web or database dependencies.
//! Every function is synchronous and works on owned or borrowed values only.
//!
//! # Modules
//!
//! - `decimal` - Checked decimal operations on top of `rust_decimal`
//! - `rounding` - Rounding engine with nine tie-break modes
//! - `currency` - Currency registry, money arithmetic and amount allocation
//! - `invoice` - Line-item engine, tax helpers, aggregation and integrity checks

pub mod currency;
pub mod decimal;
pub mod invoice;
pub mod rounding;

pub use currency::{AllocationUtil, CurrencyConfig, CurrencyRegistry};
pub use invoice::{InvoiceService, LineItemService, TaxService};
pub use rounding::{RoundingAdjustment, RoundingService};
pub use tally_shared::{CalcError, CalcResult, Money, RoundingMode};
