use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One point of a portfolio time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// Portfolio history: one entry per distinct transaction date in each
/// series, extended to today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHistory {
    /// Running net capital committed: deposits minus withdrawals, each at
    /// its own recorded price. Distinct from cost basis remaining.
    pub invested: Vec<HistoryPoint>,
    /// Accumulated yield quantities valued at today's prices at every point.
    pub earnings: Vec<HistoryPoint>,
}
