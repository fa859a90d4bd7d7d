use serde::{Deserialize, Serialize};
use std::fmt;

use crate::currency::symbol_for;

// ==================================================================================================
// Models for /accounts/{id}/balances/
// ==================================================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BalanceAmount {
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub balance_amount: BalanceAmount,
    pub balance_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BalanceData {
    #[serde(default)]
    pub balances: Vec<Balance>,
}

impl BalanceData {
    /// First balance of the given type (e.g. `interimAvailable`, `interimBooked`)
    pub fn find(&self, balance_type: &str) -> Option<&Balance> {
        self.balances.iter().find(|b| b.balance_type == balance_type)
    }
}

/// One balance reduced to a number and its display currency
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountBalance {
    pub amount: f64,
    pub currency: String,
    pub symbol: String,
}

impl AccountBalance {
    /// Pick `balance_type` out of a balance listing
    ///
    /// A missing type yields a zero amount with empty currency; an amount
    /// that does not parse as a number is reported as zero.
    pub fn from_balances(data: &BalanceData, balance_type: &str) -> Self {
        match data.find(balance_type) {
            Some(balance) => {
                let currency = balance.balance_amount.currency.clone();
                Self {
                    amount: balance.balance_amount.amount.parse().unwrap_or(0.0),
                    symbol: symbol_for(&currency).to_string(),
                    currency,
                }
            }
            None => Self::default(),
        }
    }
}

impl fmt::Display for AccountBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.symbol, self.amount)
    }
}

// ==================================================================================================
// Models for /accounts/{id}/details/
// ==================================================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountDetails {
    pub resource_id: String,
    pub iban: String,
    pub currency: String,
    pub owner_name: String,
    pub name: String,
    pub product: String,
    pub cash_account_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccountData {
    pub account: AccountDetails,
}
