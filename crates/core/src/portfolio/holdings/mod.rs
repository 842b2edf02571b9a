//! Holdings module - transaction folding and live valuation.

pub mod holdings_calculator;
mod holdings_model;
pub mod holdings_valuation;

pub use holdings_calculator::*;
pub use holdings_model::*;
pub use holdings_valuation::*;
