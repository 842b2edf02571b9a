//! Core error types for the portfolio engine.
//!
//! The engine itself degrades missing optional data to safe defaults; typed
//! errors arise only at the input-validation boundary and, when the Reject
//! overdraft policy is active, inside the holdings calculation.

use chrono::ParseError as ChronoParseError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the portfolio engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Holdings calculation failed: {0}")]
    Calculation(#[from] CalculatorError),
}

/// Validation errors for externally supplied transaction data.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Unknown transaction type: {0}")]
    UnknownTransactionType(String),

    #[error("Required field '{0}' is missing or empty")]
    MissingField(String),

    #[error("Field '{field}' must not be negative, got {value}")]
    NegativeValue { field: &'static str, value: Decimal },

    #[error("Payment amount {0} given without a payment currency")]
    FundingWithoutCurrency(Decimal),

    #[error("LP range minimum {min} exceeds maximum {max}")]
    InvertedLpRange { min: Decimal, max: Decimal },

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),
}

/// Errors that occur during holdings calculations.
#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error(
        "Insufficient holdings of {symbol}: requested {requested}, available {available} (transaction {transaction_id})"
    )]
    InsufficientHoldings {
        symbol: String,
        requested: Decimal,
        available: Decimal,
        transaction_id: String,
    },
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
