//! Currency metadata, money arithmetic and amount allocation.

pub mod allocation;
pub mod money_ops;
pub mod registry;

#[cfg(test)]
mod props;

pub use allocation::AllocationUtil;
pub use money_ops::{add_money, divide_money, multiply_money, subtract_money, sum_money};
pub use registry::{CurrencyConfig, CurrencyRegistry};
