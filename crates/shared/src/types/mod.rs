//! Common types used across the application.

pub mod money;
pub mod rounding;

pub use money::Money;
pub use rounding::RoundingMode;
