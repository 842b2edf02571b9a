use crate::errors::{CalculatorError, Result};
use crate::portfolio::holdings::holdings_valuation::apply_live_valuation;
use crate::portfolio::holdings::{
    dust_threshold, quantity_epsilon, AssetHolding, AssetOverride, OverdraftPolicy,
};
use crate::quotes::PriceMap;
use crate::transactions::{
    normalize_symbol, sort_transactions_by_date, Funding, LpMetadata, Transaction, TransactionKind,
};

use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Symbol -> holding-in-progress book for one fold, plus the order of first
/// appearance so output order matches the source's insertion order.
#[derive(Default)]
struct HoldingsBook {
    holdings: HashMap<String, AssetHolding>,
    order: Vec<String>,
}

impl HoldingsBook {
    /// Locates the holding for a normalized symbol, creating it
    /// zero-initialized on first reference.
    fn entry(&mut self, symbol: &str) -> &mut AssetHolding {
        match self.holdings.entry(symbol.to_string()) {
            Entry::Vacant(vacant) => {
                self.order.push(symbol.to_string());
                vacant.insert(AssetHolding::new(symbol.to_string()))
            }
            Entry::Occupied(occupied) => occupied.into_mut(),
        }
    }

    fn into_holdings(self) -> Vec<AssetHolding> {
        let mut holdings = self.holdings;
        self.order
            .into_iter()
            .filter_map(|symbol| holdings.remove(&symbol))
            .collect()
    }
}

/// Folds the transaction log into asset holdings with weighted-average cost
/// basis, then projects the result onto the live price map.
///
/// Pure with respect to its inputs: the calculator sorts an internal copy and
/// never mutates the caller's slice, so identical inputs always produce
/// identical snapshots.
#[derive(Debug, Clone, Default)]
pub struct HoldingsCalculator {
    overdraft_policy: OverdraftPolicy,
}

impl HoldingsCalculator {
    pub fn new(overdraft_policy: OverdraftPolicy) -> Self {
        Self { overdraft_policy }
    }

    /// Computes the current holdings snapshot for every asset touched by the
    /// transaction log, dust-filtered and in order of first appearance.
    pub fn calculate_holdings(
        &self,
        transactions: &[Transaction],
        prices: &PriceMap,
        overrides: &HashMap<String, AssetOverride>,
    ) -> Result<Vec<AssetHolding>> {
        debug!(
            "Calculating holdings for {} transactions ({} overrides)",
            transactions.len(),
            overrides.len()
        );

        let overrides: HashMap<String, &AssetOverride> = overrides
            .iter()
            .map(|(symbol, asset_override)| (normalize_symbol(symbol), asset_override))
            .collect();

        let mut book = HoldingsBook::default();
        for transaction in sort_transactions_by_date(transactions) {
            self.process_transaction(transaction, &mut book, &overrides)?;
        }

        let mut holdings = book.into_holdings();
        apply_live_valuation(&mut holdings, prices);

        let dust = dust_threshold();
        holdings.retain(|holding| holding.quantity > dust);
        Ok(holdings)
    }

    fn process_transaction(
        &self,
        transaction: &Transaction,
        book: &mut HoldingsBook,
        overrides: &HashMap<String, &AssetOverride>,
    ) -> Result<()> {
        let symbol = normalize_symbol(&transaction.asset_symbol);
        match &transaction.kind {
            TransactionKind::Transfer => {
                // Informational only; transfers never mutate holdings.
                debug!("Skipping transfer {}", transaction.id);
                Ok(())
            }
            TransactionKind::Deposit { funding, lp } => self.handle_deposit(
                transaction,
                &symbol,
                funding.as_ref(),
                lp.as_ref(),
                book,
                overrides,
            ),
            TransactionKind::Interest => {
                self.handle_interest(transaction, &symbol, book, overrides)
            }
            TransactionKind::Withdrawal => {
                self.handle_withdrawal(transaction, &symbol, book, overrides)
            }
        }
    }

    /// Handle DEPOSIT: acquisition at the recorded price, plus the cost-basis
    /// debit of the funding asset when the deposit was paid with one.
    fn handle_deposit(
        &self,
        transaction: &Transaction,
        symbol: &str,
        funding: Option<&Funding>,
        lp: Option<&LpMetadata>,
        book: &mut HoldingsBook,
        overrides: &HashMap<String, &AssetOverride>,
    ) -> Result<()> {
        let holding = book.entry(symbol);
        holding.quantity += transaction.amount;
        holding.total_invested += transaction.amount * transaction.price();
        if let Some(lp) = lp {
            if let Some(range) = &lp.range {
                holding.lp_range = Some(range.clone());
            }
            if let Some(monitor_symbol) = &lp.monitor_symbol {
                holding.monitor_symbol = Some(monitor_symbol.clone());
            }
        }
        finish_mutation(holding, overrides);

        if let Some(funding) = funding {
            if funding.spends_held_asset() {
                self.debit_funding_asset(transaction, funding, book, overrides)?;
            }
        }
        Ok(())
    }

    /// Handle INTEREST: yield is received at zero cost basis.
    fn handle_interest(
        &self,
        transaction: &Transaction,
        symbol: &str,
        book: &mut HoldingsBook,
        overrides: &HashMap<String, &AssetOverride>,
    ) -> Result<()> {
        let holding = book.entry(symbol);
        holding.quantity += transaction.amount;
        *holding.earned_quantity.get_or_insert(Decimal::ZERO) += transaction.amount;
        finish_mutation(holding, overrides);
        Ok(())
    }

    /// Handle WITHDRAWAL: disposal at the average cost held before the
    /// mutation, so the remaining basis keeps the same average.
    fn handle_withdrawal(
        &self,
        transaction: &Transaction,
        symbol: &str,
        book: &mut HoldingsBook,
        overrides: &HashMap<String, &AssetOverride>,
    ) -> Result<()> {
        let holding = book.entry(symbol);
        self.check_overdraft(holding, transaction.amount, &transaction.id)?;

        let average_cost = holding.average_cost();
        holding.total_invested -= transaction.amount * average_cost;
        holding.quantity -= transaction.amount;
        if transaction.is_moved_to_lp() {
            *holding.locked_in_lp_quantity.get_or_insert(Decimal::ZERO) += transaction.amount;
        }
        self.settle_reduction(holding, &transaction.id);
        finish_mutation(holding, overrides);
        Ok(())
    }

    /// A deposit paid with another held asset sells that asset at its current
    /// average cost to fund the acquisition. No realized gain is tracked for
    /// this implicit disposal.
    fn debit_funding_asset(
        &self,
        transaction: &Transaction,
        funding: &Funding,
        book: &mut HoldingsBook,
        overrides: &HashMap<String, &AssetOverride>,
    ) -> Result<()> {
        let symbol = normalize_symbol(&funding.currency);
        let holding = book.entry(&symbol);
        self.check_overdraft(holding, funding.amount, &transaction.id)?;

        let average_cost = holding.average_cost();
        holding.total_invested -= funding.amount * average_cost;
        holding.quantity -= funding.amount;
        self.settle_reduction(holding, &transaction.id);
        finish_mutation(holding, overrides);
        Ok(())
    }

    fn check_overdraft(
        &self,
        holding: &AssetHolding,
        requested: Decimal,
        transaction_id: &str,
    ) -> Result<()> {
        if self.overdraft_policy == OverdraftPolicy::Reject
            && requested > holding.quantity + quantity_epsilon()
        {
            return Err(CalculatorError::InsufficientHoldings {
                symbol: holding.symbol.clone(),
                requested,
                available: holding.quantity,
                transaction_id: transaction_id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Applies the configured overdraft policy after a reduction left the
    /// holding in a possibly negative state.
    fn settle_reduction(&self, holding: &mut AssetHolding, transaction_id: &str) {
        if !holding.quantity.is_sign_negative() || holding.quantity.is_zero() {
            return;
        }
        match self.overdraft_policy {
            OverdraftPolicy::Allow => {
                warn!(
                    "Transaction {} overdraws {}: quantity now {}",
                    transaction_id, holding.symbol, holding.quantity
                );
            }
            OverdraftPolicy::ClampToZero => {
                warn!(
                    "Transaction {} overdraws {}: clamping quantity {} to zero",
                    transaction_id, holding.symbol, holding.quantity
                );
                holding.quantity = Decimal::ZERO;
                holding.total_invested = Decimal::ZERO;
            }
            // Rejected before the reduction was applied.
            OverdraftPolicy::Reject => {}
        }
    }
}

/// Clamp, recompute the average, then re-apply the symbol's override so the
/// snapshot always reflects it.
fn finish_mutation(holding: &mut AssetHolding, overrides: &HashMap<String, &AssetOverride>) {
    holding.recalculate_aggregates();
    if let Some(asset_override) = overrides.get(&holding.symbol) {
        holding.apply_override(asset_override);
    }
}
