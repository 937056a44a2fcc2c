//! Rounding engine.
//!
//! Reduces arbitrary-precision decimals to a target scale under one of nine
//! rounding modes, optionally reporting the signed adjustment introduced.

pub mod service;
pub mod types;

#[cfg(test)]
mod props;

pub use service::RoundingService;
pub use types::RoundingAdjustment;
