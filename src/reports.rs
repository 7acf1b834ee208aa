// Copyright (c) 2025 Defter Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::models::{Project, Transaction, TxType};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("No project with id {0}")]
    UnknownProject(i64),
}

/// Which side of the books a transaction lands on. Collections are
/// credit-side events, payments debit-side; both report builders share this
/// mapping so the two reports cannot disagree on the convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Debit,
    Credit,
}

impl Side {
    pub fn of(tx_type: TxType) -> Side {
        match tx_type {
            TxType::Payment => Side::Debit,
            TxType::Collection => Side::Credit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceEntry {
    pub project_code: String,
    pub project_name: String,
    pub opening_debit: Decimal,
    pub opening_credit: Decimal,
    pub period_debit: Decimal,
    pub period_credit: Decimal,
    pub closing_debit: Decimal,
    pub closing_credit: Decimal,
    pub home_opening_debit: Decimal,
    pub home_opening_credit: Decimal,
    pub home_period_debit: Decimal,
    pub home_period_credit: Decimal,
    pub home_closing_debit: Decimal,
    pub home_closing_credit: Decimal,
}

impl TrialBalanceEntry {
    fn zeroed(project: &Project) -> Self {
        TrialBalanceEntry {
            project_code: project.code.clone(),
            project_name: project.name.clone(),
            opening_debit: Decimal::ZERO,
            opening_credit: Decimal::ZERO,
            period_debit: Decimal::ZERO,
            period_credit: Decimal::ZERO,
            closing_debit: Decimal::ZERO,
            closing_credit: Decimal::ZERO,
            home_opening_debit: Decimal::ZERO,
            home_opening_credit: Decimal::ZERO,
            home_period_debit: Decimal::ZERO,
            home_period_credit: Decimal::ZERO,
            home_closing_debit: Decimal::ZERO,
            home_closing_credit: Decimal::ZERO,
        }
    }
}

/// Trial balance output: one entry per project in roster order, plus the
/// count of transactions that referenced no known project and were left out.
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalance {
    pub entries: Vec<TrialBalanceEntry>,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeAmounts {
    pub debit: Decimal,
    pub credit: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub description: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub balance: Decimal,
    pub currency: String,
    pub home: HomeAmounts,
}

pub const OPENING_DESCRIPTION: &str = "Opening balance";

/// Build the trial balance over the inclusive window `[start, end]`.
///
/// Returns exactly one entry per project, in `projects` order. Transactions
/// dated before `start` accumulate into the opening columns, those inside the
/// window into the period columns; closing is the derived sum of the two.
/// Debit and credit columns are independent non-negative sums, never netted.
/// A window with `start > end` is not an error; it just produces an empty
/// period bucket.
pub fn trial_balance(
    transactions: &[Transaction],
    projects: &[Project],
    start: NaiveDate,
    end: NaiveDate,
) -> TrialBalance {
    let mut entries: Vec<TrialBalanceEntry> =
        projects.iter().map(TrialBalanceEntry::zeroed).collect();
    let by_id: HashMap<i64, usize> = projects
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id, i))
        .collect();

    let mut skipped = 0usize;
    for tx in transactions {
        let Some(&i) = by_id.get(&tx.project_id) else {
            skipped += 1;
            continue;
        };
        let entry = &mut entries[i];
        if tx.date < start {
            match Side::of(tx.tx_type) {
                Side::Debit => {
                    entry.opening_debit += tx.amount;
                    entry.home_opening_debit += tx.home_value;
                }
                Side::Credit => {
                    entry.opening_credit += tx.amount;
                    entry.home_opening_credit += tx.home_value;
                }
            }
        } else if tx.date <= end {
            match Side::of(tx.tx_type) {
                Side::Debit => {
                    entry.period_debit += tx.amount;
                    entry.home_period_debit += tx.home_value;
                }
                Side::Credit => {
                    entry.period_credit += tx.amount;
                    entry.home_period_credit += tx.home_value;
                }
            }
        }
    }

    for entry in &mut entries {
        entry.closing_debit = entry.opening_debit + entry.period_debit;
        entry.closing_credit = entry.opening_credit + entry.period_credit;
        entry.home_closing_debit = entry.home_opening_debit + entry.home_period_debit;
        entry.home_closing_credit = entry.home_opening_credit + entry.home_period_credit;
    }

    TrialBalance { entries, skipped }
}

/// Build the running-balance ledger for one project over `[start, end]`.
///
/// Transactions dated before `start` are folded into a single synthetic
/// opening row dated `start`. Pre-window activity can span several
/// currencies, so that row is labelled with the home currency; its amount
/// columns are the plain sums of the contributing transactions. Window rows
/// keep their own currency and are ordered by date ascending, input order
/// breaking ties. The balance is signed, debit-positive, and carried after
/// each row on both the original and home tracks.
///
/// An unknown `project_id` is an error; a known project with no transactions
/// yields an empty ledger.
pub fn ledger(
    transactions: &[Transaction],
    projects: &[Project],
    project_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    home_currency: &str,
) -> Result<Vec<LedgerEntry>, ReportError> {
    if !projects.iter().any(|p| p.id == project_id) {
        return Err(ReportError::UnknownProject(project_id));
    }

    let mut rows = Vec::new();
    let mut balance = Decimal::ZERO;
    let mut home_balance = Decimal::ZERO;

    let mut opening_debit = Decimal::ZERO;
    let mut opening_credit = Decimal::ZERO;
    let mut home_opening_debit = Decimal::ZERO;
    let mut home_opening_credit = Decimal::ZERO;
    let mut has_opening = false;
    for tx in transactions
        .iter()
        .filter(|t| t.project_id == project_id && t.date < start)
    {
        has_opening = true;
        match Side::of(tx.tx_type) {
            Side::Debit => {
                opening_debit += tx.amount;
                home_opening_debit += tx.home_value;
            }
            Side::Credit => {
                opening_credit += tx.amount;
                home_opening_credit += tx.home_value;
            }
        }
    }
    if has_opening {
        balance = opening_debit - opening_credit;
        home_balance = home_opening_debit - home_opening_credit;
        rows.push(LedgerEntry {
            date: start,
            description: OPENING_DESCRIPTION.to_string(),
            debit: opening_debit,
            credit: opening_credit,
            balance,
            currency: home_currency.to_string(),
            home: HomeAmounts {
                debit: home_opening_debit,
                credit: home_opening_credit,
                balance: home_balance,
            },
        });
    }

    let mut window: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.project_id == project_id && t.date >= start && t.date <= end)
        .collect();
    window.sort_by_key(|t| t.date);

    for tx in window {
        match Side::of(tx.tx_type) {
            Side::Debit => {
                balance += tx.amount;
                home_balance += tx.home_value;
                rows.push(LedgerEntry {
                    date: tx.date,
                    description: tx.description.clone(),
                    debit: tx.amount,
                    credit: Decimal::ZERO,
                    balance,
                    currency: tx.currency.clone(),
                    home: HomeAmounts {
                        debit: tx.home_value,
                        credit: Decimal::ZERO,
                        balance: home_balance,
                    },
                });
            }
            Side::Credit => {
                balance -= tx.amount;
                home_balance -= tx.home_value;
                rows.push(LedgerEntry {
                    date: tx.date,
                    description: tx.description.clone(),
                    debit: Decimal::ZERO,
                    credit: tx.amount,
                    balance,
                    currency: tx.currency.clone(),
                    home: HomeAmounts {
                        debit: Decimal::ZERO,
                        credit: tx.home_value,
                        balance: home_balance,
                    },
                });
            }
        }
    }

    Ok(rows)
}
