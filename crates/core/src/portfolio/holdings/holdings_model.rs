use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DUST_THRESHOLD, MIN_INVESTED_FOR_PNL, QUANTITY_EPSILON};
use crate::transactions::LpRange;

/// Quantity at or below which a holding is clamped to exactly zero.
pub fn quantity_epsilon() -> Decimal {
    Decimal::from_str_radix(QUANTITY_EPSILON, 10).unwrap_or_else(|_| Decimal::new(1, 8))
}

/// Snapshot output excludes holdings at or below this quantity.
pub fn dust_threshold() -> Decimal {
    Decimal::from_str_radix(DUST_THRESHOLD, 10).unwrap_or_else(|_| Decimal::new(1, 6))
}

/// Invested capital below this reports a P&L percentage of zero.
pub fn min_invested_for_pnl() -> Decimal {
    Decimal::from_str_radix(MIN_INVESTED_FOR_PNL, 10).unwrap_or_else(|_| Decimal::new(1, 2))
}

/// How the calculator treats a reduction that exceeds the held quantity.
///
/// The source behavior is `Allow`: the overdraft is applied as-is, leaving a
/// negative balance that falls out of the snapshot at the dust filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverdraftPolicy {
    #[default]
    Allow,
    ClampToZero,
    Reject,
}

/// User-supplied per-symbol correction, re-applied on every computation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetOverride {
    /// Forces the computed average cost; `totalInvested` is re-derived from it.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_buy_price: Option<Decimal>,
    /// Symbols of reward tokens associated with this asset's yield.
    /// Pass-through metadata only.
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reward_tokens: Vec<String>,
}

/// Derived snapshot of one held asset.
///
/// Rebuilt fresh on every computation; holdings have no persisted identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetHolding {
    pub symbol: String,
    pub quantity: Decimal,
    /// Cost basis remaining, weighted-average accounting.
    pub total_invested: Decimal,
    pub average_buy_price: Decimal,
    pub current_price: Decimal,
    pub current_value: Decimal,
    pub unrealized_pnl: Decimal,
    pub pnl_percentage: Decimal,
    /// Cumulative interest-sourced quantity.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earned_quantity: Option<Decimal>,
    /// Quantity withdrawn into a liquidity pool; still economically held,
    /// tracked for display only.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_in_lp_quantity: Option<Decimal>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lp_range: Option<LpRange>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor_symbol: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor_price: Option<Decimal>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_range: Option<bool>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reward_tokens: Vec<String>,
}

impl AssetHolding {
    /// Zero-initialized holding, created lazily on first reference.
    pub fn new(symbol: String) -> Self {
        AssetHolding {
            symbol,
            quantity: Decimal::ZERO,
            total_invested: Decimal::ZERO,
            average_buy_price: Decimal::ZERO,
            current_price: Decimal::ZERO,
            current_value: Decimal::ZERO,
            unrealized_pnl: Decimal::ZERO,
            pnl_percentage: Decimal::ZERO,
            earned_quantity: None,
            locked_in_lp_quantity: None,
            lp_range: None,
            monitor_symbol: None,
            monitor_price: None,
            in_range: None,
            reward_tokens: Vec::new(),
        }
    }

    /// Average cost of the currently held quantity, zero when nothing is held.
    pub fn average_cost(&self) -> Decimal {
        if self.quantity > Decimal::ZERO {
            self.total_invested / self.quantity
        } else {
            Decimal::ZERO
        }
    }

    /// Re-derives the aggregates after a mutation: clamps floating-point
    /// residue to exactly zero, then recomputes the average buy price.
    pub fn recalculate_aggregates(&mut self) {
        let epsilon = quantity_epsilon();
        if self.quantity.abs() <= epsilon {
            if !self.quantity.is_zero() {
                warn!(
                    "Holding {} quantity ({}) within epsilon after mutation; clamped to zero.",
                    self.symbol, self.quantity
                );
            }
            self.quantity = Decimal::ZERO;
            self.total_invested = Decimal::ZERO;
        } else if self.total_invested.abs() <= epsilon {
            self.total_invested = Decimal::ZERO;
        }
        self.average_buy_price = self.average_cost();
    }

    /// Applies a user override: the forced average cost wins and the cost
    /// basis is re-derived from it. Idempotent.
    pub fn apply_override(&mut self, asset_override: &AssetOverride) {
        if let Some(avg_buy_price) = asset_override.avg_buy_price {
            self.average_buy_price = avg_buy_price;
            self.total_invested = self.quantity * avg_buy_price;
        }
        if !asset_override.reward_tokens.is_empty() {
            self.reward_tokens = asset_override.reward_tokens.clone();
        }
    }

    /// True for liquidity-pool style holdings, which fall back to cost value
    /// when no market price exists.
    pub fn is_lp_position(&self) -> bool {
        self.symbol.starts_with("LP") || self.lp_range.is_some()
    }
}
