//! Price lookup supplied by the surrounding application.
//!
//! The engine never fetches prices; it receives a symbol -> price snapshot
//! from the app's price feed cache and treats missing symbols as price 0.

use crate::transactions::normalize_symbol;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Separator in a pair monitor symbol such as `"ETH/USDC"`.
const PAIR_SEPARATOR: char = '/';

/// Live price map keyed by normalized asset symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceMap {
    prices: HashMap<String, Decimal>,
}

impl PriceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: &str, price: Decimal) {
        self.prices.insert(normalize_symbol(symbol), price);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Current price for a symbol, or zero when unquoted.
    pub fn price_for(&self, symbol: &str) -> Decimal {
        self.prices
            .get(&normalize_symbol(symbol))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Resolves the price watched by an LP range monitor.
    ///
    /// A symbol containing `/` is read as a pair and priced as the ratio of
    /// its legs; an unquoted or zero denominator resolves to zero. Any other
    /// symbol is a direct lookup.
    pub fn resolve_monitor_price(&self, monitor_symbol: &str) -> Decimal {
        match monitor_symbol.split_once(PAIR_SEPARATOR) {
            Some((base, quote)) => {
                let quote_price = self.price_for(quote);
                if quote_price.is_zero() {
                    Decimal::ZERO
                } else {
                    self.price_for(base) / quote_price
                }
            }
            None => self.price_for(monitor_symbol),
        }
    }
}

impl<S: AsRef<str>> FromIterator<(S, Decimal)> for PriceMap {
    fn from_iter<I: IntoIterator<Item = (S, Decimal)>>(iter: I) -> Self {
        let mut map = PriceMap::new();
        for (symbol, price) in iter {
            map.insert(symbol.as_ref(), price);
        }
        map
    }
}
