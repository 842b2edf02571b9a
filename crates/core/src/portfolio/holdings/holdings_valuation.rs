//! Live valuation of computed holdings.
//!
//! Separate pass from the transaction fold: the fold owns cost-basis
//! accounting, this pass projects the result onto the price snapshot.

use crate::portfolio::holdings::{min_invested_for_pnl, AssetHolding};
use crate::quotes::PriceMap;

use log::debug;
use rust_decimal::Decimal;

/// Sets current price, LP monitor state, current value, and unrealized P&L
/// on every holding, in place.
pub fn apply_live_valuation(holdings: &mut [AssetHolding], prices: &PriceMap) {
    for holding in holdings.iter_mut() {
        holding.current_price = prices.price_for(&holding.symbol);

        if let Some(monitor_symbol) = &holding.monitor_symbol {
            let monitor_price = prices.resolve_monitor_price(monitor_symbol);
            holding.monitor_price = Some(monitor_price);
            if monitor_price > Decimal::ZERO {
                if let Some(range) = &holding.lp_range {
                    holding.in_range = Some(range.contains(monitor_price));
                }
            }
        }

        holding.current_value = if holding.current_price.is_zero() && holding.is_lp_position() {
            // Unpriced LP positions hold their cost value rather than
            // reporting as worthless.
            debug!(
                "No quote for LP position {}; valuing at cost {}",
                holding.symbol, holding.total_invested
            );
            holding.total_invested
        } else {
            holding.quantity * holding.current_price
        };

        holding.unrealized_pnl = holding.current_value - holding.total_invested;
        holding.pnl_percentage = if holding.total_invested >= min_invested_for_pnl() {
            (holding.unrealized_pnl / holding.total_invested) * Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
    }
}
