//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Money values scoped to a currency code
//! - Rounding modes understood by the rounding engine
//! - Calculation error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, RoundingConfig};
pub use error::{CalcError, CalcResult};
pub use types::{Money, RoundingMode};
