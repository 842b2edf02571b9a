//! Transaction domain models.

use crate::errors::{Result, ValidationError};
use crate::transactions::transactions_constants::*;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Normalizes a user-entered asset symbol: trimmed, uppercase.
///
/// Applied to every symbol before it is used as a lookup key, so `" eth "`
/// and `"ETH"` resolve to the same holding.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Closed set of transaction types as stored by the surrounding app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Interest,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => TRANSACTION_TYPE_DEPOSIT,
            TransactionType::Withdrawal => TRANSACTION_TYPE_WITHDRAWAL,
            TransactionType::Interest => TRANSACTION_TYPE_INTEREST,
            TransactionType::Transfer => TRANSACTION_TYPE_TRANSFER,
        }
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            s if s == TRANSACTION_TYPE_DEPOSIT => Ok(TransactionType::Deposit),
            s if s == TRANSACTION_TYPE_WITHDRAWAL => Ok(TransactionType::Withdrawal),
            s if s == TRANSACTION_TYPE_INTEREST => Ok(TransactionType::Interest),
            s if s == TRANSACTION_TYPE_TRANSFER => Ok(TransactionType::Transfer),
            _ => Err(ValidationError::UnknownTransactionType(s.to_string())),
        }
    }
}

/// Price band monitored for a liquidity-pool position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LpRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl LpRange {
    /// Inclusive on both ends.
    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }
}

/// Pass-through metadata attached to liquidity-pool-style deposits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LpMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<LpRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor_symbol: Option<String>,
}

/// Records the held asset spent to fund a deposit.
///
/// Pairing the currency and the amount in one struct keeps "payment amount
/// without payment currency" unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Funding {
    pub currency: String,
    pub amount: Decimal,
}

impl Funding {
    /// True when the deposit consumed another held asset rather than raw
    /// quote-currency cash.
    pub fn spends_held_asset(&self) -> bool {
        normalize_symbol(&self.currency) != QUOTE_CURRENCY
    }
}

/// Transaction kind with the optional payload each kind can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Deposit {
        #[serde(skip_serializing_if = "Option::is_none")]
        funding: Option<Funding>,
        #[serde(skip_serializing_if = "Option::is_none")]
        lp: Option<LpMetadata>,
    },
    Withdrawal,
    Interest,
    Transfer,
}

impl TransactionKind {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TransactionKind::Deposit { .. } => TransactionType::Deposit,
            TransactionKind::Withdrawal => TransactionType::Withdrawal,
            TransactionKind::Interest => TransactionType::Interest,
            TransactionKind::Transfer => TransactionType::Transfer,
        }
    }
}

/// Domain model representing one entry of the append-only transaction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(flatten)]
    pub kind: TransactionKind,
    pub asset_symbol: String,
    /// Quantity of the asset moved; sign is implied by the kind.
    pub amount: Decimal,
    /// Unit price in the quote currency at transaction time. Absent means
    /// the movement carries no cost (price 0).
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_unit: Option<Decimal>,
    pub date: NaiveDate,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Transaction {
    pub fn transaction_type(&self) -> TransactionType {
        self.kind.transaction_type()
    }

    /// Get unit price, defaulting to zero if not set.
    pub fn price(&self) -> Decimal {
        self.price_per_unit.unwrap_or(Decimal::ZERO)
    }

    /// True when this withdrawal's quantity went into a liquidity pool.
    pub fn is_moved_to_lp(&self) -> bool {
        self.notes
            .as_deref()
            .is_some_and(|notes| notes.contains(MOVED_TO_LP_MARKER))
    }

    /// Checks the fields the calculators rely on.
    ///
    /// Drafts converted via `TryFrom<TransactionDraft>` are already valid;
    /// callers constructing `Transaction` directly can re-check here.
    pub fn validate(&self) -> Result<()> {
        if normalize_symbol(&self.asset_symbol).is_empty() {
            return Err(ValidationError::MissingField("assetSymbol".to_string()).into());
        }
        if self.amount.is_sign_negative() {
            return Err(ValidationError::NegativeValue {
                field: "amount",
                value: self.amount,
            }
            .into());
        }
        if let Some(price) = self.price_per_unit {
            if price.is_sign_negative() {
                return Err(ValidationError::NegativeValue {
                    field: "pricePerUnit",
                    value: price,
                }
                .into());
            }
        }
        if let TransactionKind::Deposit { funding, lp } = &self.kind {
            if let Some(funding) = funding {
                if funding.amount.is_sign_negative() {
                    return Err(ValidationError::NegativeValue {
                        field: "paymentAmount",
                        value: funding.amount,
                    }
                    .into());
                }
            }
            if let Some(range) = lp.as_ref().and_then(|lp| lp.range.as_ref()) {
                if range.min > range.max {
                    return Err(ValidationError::InvertedLpRange {
                        min: range.min,
                        max: range.max,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}

/// Raw transaction record as entered in the surrounding app's forms and
/// stored in its object store. One flat record with many optional fields;
/// converting into [`Transaction`] validates it into the typed shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub asset_symbol: String,
    pub amount: Decimal,
    #[serde(default)]
    pub price_per_unit: Option<Decimal>,
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub payment_currency: Option<String>,
    #[serde(default)]
    pub payment_amount: Option<Decimal>,
    #[serde(default)]
    pub lp_range: Option<LpRange>,
    #[serde(default)]
    pub monitor_symbol: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TryFrom<TransactionDraft> for Transaction {
    type Error = crate::errors::Error;

    fn try_from(draft: TransactionDraft) -> Result<Self> {
        let transaction_type = TransactionType::from_str(draft.transaction_type.trim())?;
        let date = NaiveDate::parse_from_str(draft.date.trim(), TRANSACTION_DATE_FORMAT)?;

        let kind = match transaction_type {
            TransactionType::Deposit => {
                let funding = match (draft.payment_currency, draft.payment_amount) {
                    (Some(currency), amount) => Some(Funding {
                        currency: normalize_symbol(&currency),
                        // Amount omitted on the form degrades to zero.
                        amount: amount.unwrap_or(Decimal::ZERO),
                    }),
                    (None, Some(amount)) => {
                        return Err(ValidationError::FundingWithoutCurrency(amount).into())
                    }
                    (None, None) => None,
                };
                let lp = if draft.lp_range.is_some() || draft.monitor_symbol.is_some() {
                    Some(LpMetadata {
                        range: draft.lp_range,
                        monitor_symbol: draft.monitor_symbol,
                    })
                } else {
                    None
                };
                TransactionKind::Deposit { funding, lp }
            }
            TransactionType::Withdrawal => TransactionKind::Withdrawal,
            TransactionType::Interest => TransactionKind::Interest,
            TransactionType::Transfer => TransactionKind::Transfer,
        };

        let transaction = Transaction {
            id: draft.id,
            kind,
            asset_symbol: normalize_symbol(&draft.asset_symbol),
            amount: draft.amount,
            price_per_unit: draft.price_per_unit,
            date,
            notes: draft.notes,
        };
        transaction.validate()?;
        Ok(transaction)
    }
}

/// Stable ascending sort on date only, so same-date transactions keep their
/// insertion order. Average-cost accounting is path-dependent, which makes
/// this ordering part of the contract for both engine passes.
pub fn sort_transactions_by_date(transactions: &[Transaction]) -> Vec<&Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|transaction| transaction.date);
    sorted
}
