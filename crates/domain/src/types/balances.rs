//! Account balances.
//!
//! The bank returns one entry per balance type; entries are folded into one
//! [`AccountBalance`] per account, keeping the order accounts first appear in.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditDebit {
    Credit,
    Debit,
}

/// Amounts of one account by balance type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BalanceAmounts {
    /// `OpeningAvailable`: the total at the start of the day.
    pub opening_available: Option<Decimal>,
    /// `ClosingAvailable`: what can be spent now.
    pub closing_available: Option<Decimal>,
    /// `Expected`: funds on hold.
    pub expected: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBalance {
    pub account_id: String,
    pub indicator: CreditDebit,
    pub updated_at: DateTime<Utc>,
    pub currency: String,
    pub amounts: BalanceAmounts,
}

/// `Data` of the balances endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawBalances")]
pub struct BalanceList {
    pub balances: Vec<AccountBalance>,
}

#[derive(Deserialize)]
struct RawBalances {
    #[serde(rename = "Balance")]
    balance: super::serde_helpers::OneOrMany<RawBalance>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBalance {
    account_id: String,
    credit_debit_indicator: CreditDebit,
    #[serde(rename = "type")]
    kind: BalanceType,
    #[serde(deserialize_with = "super::serde_helpers::bank_datetime")]
    date_time: DateTime<Utc>,
    #[serde(rename = "Amount")]
    amount: RawAmount,
}

#[derive(Deserialize)]
struct RawAmount {
    amount: Decimal,
    currency: String,
}

#[derive(Deserialize)]
enum BalanceType {
    OpeningAvailable,
    ClosingAvailable,
    Expected,
    #[serde(other)]
    Other,
}

impl From<RawBalances> for BalanceList {
    fn from(raw: RawBalances) -> Self {
        let mut balances: Vec<AccountBalance> = Vec::new();

        for entry in raw.balance.into_vec() {
            let position = balances.iter().position(|b| b.account_id == entry.account_id);
            let balance = match position {
                Some(index) => &mut balances[index],
                None => {
                    balances.push(AccountBalance {
                        account_id: entry.account_id.clone(),
                        indicator: entry.credit_debit_indicator,
                        updated_at: entry.date_time,
                        currency: entry.amount.currency.clone(),
                        amounts: BalanceAmounts::default(),
                    });
                    let last = balances.len() - 1;
                    &mut balances[last]
                }
            };

            balance.currency = entry.amount.currency;
            let amount = Some(entry.amount.amount);
            match entry.kind {
                BalanceType::OpeningAvailable => balance.amounts.opening_available = amount,
                BalanceType::ClosingAvailable => balance.amounts.closing_available = amount,
                BalanceType::Expected => balance.amounts.expected = amount,
                BalanceType::Other => {}
            }
        }

        Self { balances }
    }
}
