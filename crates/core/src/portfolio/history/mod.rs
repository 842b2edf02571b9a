//! History module - invested-capital and earnings time series.

pub mod history_calculator;
mod history_model;

pub use history_calculator::*;
pub use history_model::*;

#[cfg(test)]
mod history_calculator_tests;
