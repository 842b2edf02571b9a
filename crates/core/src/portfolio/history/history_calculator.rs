//! Portfolio history projection.
//!
//! Walks the distinct transaction dates once with two monotone cursors over
//! the date-sorted log: one accumulating net invested capital, one
//! accumulating interest quantities by symbol. The cursors stay separate
//! because the two series follow unrelated accumulation rules; each remains
//! O(n) with no backtracking.

use crate::portfolio::history::{HistoryPoint, PortfolioHistory};
use crate::quotes::PriceMap;
use crate::transactions::{
    normalize_symbol, sort_transactions_by_date, Transaction, TransactionKind,
};
use crate::utils::time_utils::valuation_date_today;

use chrono::NaiveDate;
use log::debug;
use num_traits::Zero;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Convenience wrapper extending the series to the current local date.
pub fn calculate_portfolio_history_as_of_now(
    transactions: &[Transaction],
    prices: &PriceMap,
) -> PortfolioHistory {
    calculate_portfolio_history(transactions, prices, valuation_date_today())
}

/// Projects the transaction log into the invested-capital and earnings
/// series, one point per distinct date, extended to `today`.
///
/// The invested series books each deposit and withdrawal at its own recorded
/// price (capital committed, not cost basis). The earnings series values all
/// interest quantities accrued so far at the live price on every point, so
/// it reads "what accrued rewards are worth today", not a historical
/// valuation.
pub fn calculate_portfolio_history(
    transactions: &[Transaction],
    prices: &PriceMap,
    today: NaiveDate,
) -> PortfolioHistory {
    let mut dates: Vec<NaiveDate> = transactions
        .iter()
        .map(|transaction| transaction.date)
        .collect();
    dates.sort();
    dates.dedup();
    if dates.is_empty() {
        return PortfolioHistory::default();
    }
    // The series always extends to "now", even when the last transaction is
    // in the past.
    if dates.last() != Some(&today) {
        dates.push(today);
    }

    let sorted = sort_transactions_by_date(transactions);
    debug!(
        "Projecting history over {} dates ({} transactions)",
        dates.len(),
        sorted.len()
    );

    let mut invested = Vec::with_capacity(dates.len());
    let mut earnings = Vec::with_capacity(dates.len());
    let mut invested_cursor = 0;
    let mut earnings_cursor = 0;
    let mut current_invested = Decimal::zero();
    let mut accrued_by_symbol: HashMap<String, Decimal> = HashMap::new();

    for date in dates {
        while invested_cursor < sorted.len() && sorted[invested_cursor].date <= date {
            let transaction = sorted[invested_cursor];
            match transaction.kind {
                TransactionKind::Deposit { .. } => {
                    current_invested += transaction.amount * transaction.price();
                }
                TransactionKind::Withdrawal => {
                    current_invested -= transaction.amount * transaction.price();
                }
                TransactionKind::Interest | TransactionKind::Transfer => {}
            }
            invested_cursor += 1;
        }
        invested.push(HistoryPoint {
            date,
            value: current_invested,
        });

        while earnings_cursor < sorted.len() && sorted[earnings_cursor].date <= date {
            let transaction = sorted[earnings_cursor];
            if matches!(transaction.kind, TransactionKind::Interest) {
                *accrued_by_symbol
                    .entry(normalize_symbol(&transaction.asset_symbol))
                    .or_insert_with(Decimal::zero) += transaction.amount;
            }
            earnings_cursor += 1;
        }
        let earned_value = accrued_by_symbol
            .iter()
            .map(|(symbol, quantity)| *quantity * prices.price_for(symbol))
            .sum();
        earnings.push(HistoryPoint {
            date,
            value: earned_value,
        });
    }

    PortfolioHistory { invested, earnings }
}
