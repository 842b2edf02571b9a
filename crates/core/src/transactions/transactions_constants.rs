//! Wire-format constants for transaction records.

pub const TRANSACTION_TYPE_DEPOSIT: &str = "DEPOSIT";
pub const TRANSACTION_TYPE_WITHDRAWAL: &str = "WITHDRAWAL";
pub const TRANSACTION_TYPE_INTEREST: &str = "INTEREST";
pub const TRANSACTION_TYPE_TRANSFER: &str = "TRANSFER";

/// Quote currency. A deposit paid in this currency is funded with raw cash
/// and never debits another holding.
pub const QUOTE_CURRENCY: &str = "USD";

/// Note marker on a withdrawal whose quantity went into a liquidity pool.
pub const MOVED_TO_LP_MARKER: &str = "Moved to LP";

/// Date format for transaction dates as entered by the surrounding app.
pub const TRANSACTION_DATE_FORMAT: &str = "%Y-%m-%d";
