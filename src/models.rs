// Copyright (c) 2025 Defter Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub client: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Collection,
    Payment,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Collection => "collection",
            TxType::Payment => "payment",
        }
    }
}

impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TxType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collection" => Ok(TxType::Collection),
            "payment" => Ok(TxType::Payment),
            other => Err(anyhow::anyhow!(
                "Invalid transaction type '{}' (use collection|payment)",
                other
            )),
        }
    }
}

/// A single collection or payment against a project. `exchange_rate` is
/// home-currency units per one unit of `currency`, fixed when the transaction
/// is recorded; `home_value` is the stored `amount * exchange_rate`. Reports
/// read the stored value and never re-convert, so later rate changes do not
/// rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub project_id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub exchange_rate: Decimal,
    pub home_value: Decimal,
    pub tx_type: TxType,
}
