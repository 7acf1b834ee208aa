// Copyright (c) 2025 Defter Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use defter::models::{Project, Transaction, TxType};
use defter::reports::{self, ReportError, OPENING_DESCRIPTION};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn project(id: i64, code: &str, name: &str) -> Project {
    Project {
        id,
        code: code.to_string(),
        name: name.to_string(),
        client: "Acme".to_string(),
        start_date: d("2024-01-01"),
        end_date: d("2024-12-31"),
        total_amount: Decimal::ZERO,
        currency: "TRY".to_string(),
    }
}

fn tx(
    id: i64,
    project_id: i64,
    date: &str,
    description: &str,
    amount: &str,
    currency: &str,
    rate: &str,
    tx_type: TxType,
) -> Transaction {
    let amount = dec(amount);
    let rate = dec(rate);
    Transaction {
        id,
        project_id,
        date: d(date),
        description: description.to_string(),
        amount,
        currency: currency.to_string(),
        exchange_rate: rate,
        home_value: amount * rate,
        tx_type,
    }
}

#[test]
fn trial_balance_opening_period_closing() {
    let projects = vec![project(1, "A1", "P1")];
    let txs = vec![
        tx(1, 1, "2024-01-05", "advance", "1000", "TRY", "1", TxType::Payment),
        tx(2, 1, "2024-02-10", "invoice 1", "400", "TRY", "1", TxType::Collection),
        tx(3, 1, "2024-02-20", "materials", "200", "TRY", "1", TxType::Payment),
    ];
    let tb = reports::trial_balance(&txs, &projects, d("2024-02-01"), d("2024-02-28"));

    assert_eq!(tb.entries.len(), 1);
    assert_eq!(tb.skipped, 0);
    let e = &tb.entries[0];
    assert_eq!(e.project_code, "A1");
    assert_eq!(e.project_name, "P1");
    assert_eq!(e.opening_debit, dec("1000"));
    assert_eq!(e.opening_credit, Decimal::ZERO);
    assert_eq!(e.period_debit, dec("200"));
    assert_eq!(e.period_credit, dec("400"));
    assert_eq!(e.closing_debit, dec("1200"));
    assert_eq!(e.closing_credit, dec("400"));
    // Home track mirrors the original at rate 1
    assert_eq!(e.home_opening_debit, dec("1000"));
    assert_eq!(e.home_closing_debit, dec("1200"));
    assert_eq!(e.home_closing_credit, dec("400"));
}

#[test]
fn ledger_running_balance_with_opening_row() {
    let projects = vec![project(1, "A1", "P1")];
    let txs = vec![
        tx(1, 1, "2024-01-05", "advance", "1000", "TRY", "1", TxType::Payment),
        tx(2, 1, "2024-02-10", "invoice 1", "400", "TRY", "1", TxType::Collection),
        tx(3, 1, "2024-02-20", "materials", "200", "TRY", "1", TxType::Payment),
    ];
    let rows =
        reports::ledger(&txs, &projects, 1, d("2024-02-01"), d("2024-02-28"), "TRY").unwrap();

    assert_eq!(rows.len(), 3);

    let opening = &rows[0];
    assert_eq!(opening.description, OPENING_DESCRIPTION);
    assert_eq!(opening.date, d("2024-02-01"));
    assert_eq!(opening.debit, dec("1000"));
    assert_eq!(opening.credit, Decimal::ZERO);
    assert_eq!(opening.balance, dec("1000"));
    assert_eq!(opening.currency, "TRY");

    assert_eq!(rows[1].credit, dec("400"));
    assert_eq!(rows[1].debit, Decimal::ZERO);
    assert_eq!(rows[1].balance, dec("600"));

    assert_eq!(rows[2].debit, dec("200"));
    assert_eq!(rows[2].credit, Decimal::ZERO);
    assert_eq!(rows[2].balance, dec("800"));

    // Final balance equals payments minus collections over opening + period
    assert_eq!(rows.last().unwrap().balance, dec("1200") - dec("400"));
    assert_eq!(rows.last().unwrap().home.balance, dec("800"));
}

#[test]
fn trial_balance_one_row_per_project_in_roster_order() {
    let projects = vec![
        project(7, "C3", "Gamma"),
        project(2, "A1", "Alpha"),
        project(5, "B2", "Beta"),
    ];
    let txs = vec![tx(1, 5, "2024-03-01", "x", "10", "TRY", "1", TxType::Collection)];
    let tb = reports::trial_balance(&txs, &projects, d("2024-03-01"), d("2024-03-31"));

    let codes: Vec<&str> = tb.entries.iter().map(|e| e.project_code.as_str()).collect();
    assert_eq!(codes, vec!["C3", "A1", "B2"]);
}

#[test]
fn project_without_transactions_gets_all_zero_row() {
    let projects = vec![project(1, "A1", "Alpha"), project(2, "B2", "Beta")];
    let txs = vec![tx(1, 1, "2024-03-05", "x", "50", "TRY", "1", TxType::Payment)];
    let tb = reports::trial_balance(&txs, &projects, d("2024-03-01"), d("2024-03-31"));

    let idle = &tb.entries[1];
    assert_eq!(idle.project_code, "B2");
    assert_eq!(idle.opening_debit, Decimal::ZERO);
    assert_eq!(idle.opening_credit, Decimal::ZERO);
    assert_eq!(idle.period_debit, Decimal::ZERO);
    assert_eq!(idle.period_credit, Decimal::ZERO);
    assert_eq!(idle.closing_debit, Decimal::ZERO);
    assert_eq!(idle.closing_credit, Decimal::ZERO);
    assert_eq!(idle.home_closing_debit, Decimal::ZERO);
    assert_eq!(idle.home_closing_credit, Decimal::ZERO);
}

#[test]
fn unmatched_project_id_is_skipped_and_counted() {
    let projects = vec![project(1, "A1", "Alpha")];
    let txs = vec![
        tx(1, 1, "2024-03-05", "real", "100", "TRY", "1", TxType::Collection),
        tx(2, 99, "2024-03-06", "orphan", "999", "TRY", "1", TxType::Collection),
    ];
    let tb = reports::trial_balance(&txs, &projects, d("2024-03-01"), d("2024-03-31"));

    assert_eq!(tb.entries.len(), 1);
    assert_eq!(tb.skipped, 1);
    assert_eq!(tb.entries[0].period_credit, dec("100"));
    assert_eq!(tb.entries[0].closing_credit, dec("100"));
}

#[test]
fn ledger_unknown_project_is_error_empty_project_is_ok() {
    let projects = vec![project(1, "A1", "Alpha")];
    let txs: Vec<Transaction> = Vec::new();

    let err = reports::ledger(&txs, &projects, 99, d("2024-01-01"), d("2024-12-31"), "TRY")
        .unwrap_err();
    assert!(matches!(err, ReportError::UnknownProject(99)));

    let rows =
        reports::ledger(&txs, &projects, 1, d("2024-01-01"), d("2024-12-31"), "TRY").unwrap();
    assert!(rows.is_empty());
}

#[test]
fn closing_is_opening_plus_period_on_both_tracks() {
    let projects = vec![project(1, "A1", "Alpha")];
    let txs = vec![
        tx(1, 1, "2023-11-01", "old pay", "300", "USD", "30", TxType::Payment),
        tx(2, 1, "2023-12-15", "old col", "120", "TRY", "1", TxType::Collection),
        tx(3, 1, "2024-01-10", "pay", "80", "EUR", "35", TxType::Payment),
        tx(4, 1, "2024-01-20", "col", "60", "TRY", "1", TxType::Collection),
    ];
    let tb = reports::trial_balance(&txs, &projects, d("2024-01-01"), d("2024-01-31"));
    let e = &tb.entries[0];

    assert_eq!(e.closing_debit, e.opening_debit + e.period_debit);
    assert_eq!(e.closing_credit, e.opening_credit + e.period_credit);
    assert_eq!(e.home_closing_debit, e.home_opening_debit + e.home_period_debit);
    assert_eq!(e.home_closing_credit, e.home_opening_credit + e.home_period_credit);
    assert_eq!(e.home_opening_debit, dec("9000"));
    assert_eq!(e.home_period_debit, dec("2800"));
}

#[test]
fn period_credit_sum_matches_in_window_collections() {
    let projects = vec![project(1, "A1", "Alpha"), project(2, "B2", "Beta")];
    let txs = vec![
        tx(1, 1, "2024-02-05", "in", "100", "TRY", "1", TxType::Collection),
        tx(2, 2, "2024-02-06", "in", "250", "TRY", "1", TxType::Collection),
        tx(3, 1, "2024-03-01", "late", "500", "TRY", "1", TxType::Collection),
        tx(4, 9, "2024-02-07", "orphan", "77", "TRY", "1", TxType::Collection),
    ];
    let tb = reports::trial_balance(&txs, &projects, d("2024-02-01"), d("2024-02-28"));

    let total: Decimal = tb.entries.iter().map(|e| e.period_credit).sum();
    assert_eq!(total, dec("350"));
    assert_eq!(tb.skipped, 1);
}

#[test]
fn ledger_same_date_rows_keep_input_order() {
    let projects = vec![project(1, "A1", "Alpha")];
    let txs = vec![
        tx(1, 1, "2024-02-10", "first", "10", "TRY", "1", TxType::Payment),
        tx(2, 1, "2024-02-10", "second", "20", "TRY", "1", TxType::Payment),
        tx(3, 1, "2024-02-05", "earlier", "5", "TRY", "1", TxType::Payment),
    ];
    let rows =
        reports::ledger(&txs, &projects, 1, d("2024-02-01"), d("2024-02-28"), "TRY").unwrap();

    let descriptions: Vec<&str> = rows.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(descriptions, vec!["earlier", "first", "second"]);
    assert_eq!(rows[2].balance, dec("35"));
}

#[test]
fn ledger_multi_currency_opening_row_is_home_labelled() {
    let projects = vec![project(1, "A1", "Alpha")];
    let txs = vec![
        tx(1, 1, "2024-01-05", "usd pay", "100", "USD", "30", TxType::Payment),
        tx(2, 1, "2024-01-10", "try col", "500", "TRY", "1", TxType::Collection),
        tx(3, 1, "2024-02-15", "eur pay", "10", "EUR", "35", TxType::Payment),
    ];
    let rows =
        reports::ledger(&txs, &projects, 1, d("2024-02-01"), d("2024-02-28"), "TRY").unwrap();

    let opening = &rows[0];
    assert_eq!(opening.currency, "TRY");
    assert_eq!(opening.debit, dec("100"));
    assert_eq!(opening.credit, dec("500"));
    assert_eq!(opening.home.debit, dec("3000"));
    assert_eq!(opening.home.credit, dec("500"));
    assert_eq!(opening.home.balance, dec("2500"));

    // Window row keeps its own currency and home breakdown
    let row = &rows[1];
    assert_eq!(row.currency, "EUR");
    assert_eq!(row.debit, dec("10"));
    assert_eq!(row.home.debit, dec("350"));
    assert_eq!(row.home.balance, dec("2850"));

    // Debit and credit never both non-zero
    for r in &rows {
        assert!(r.debit.is_zero() || r.credit.is_zero());
    }
}

#[test]
fn inverted_window_yields_empty_period_bucket() {
    let projects = vec![project(1, "A1", "Alpha")];
    let txs = vec![
        tx(1, 1, "2024-01-05", "pre", "100", "TRY", "1", TxType::Payment),
        tx(2, 1, "2024-02-10", "mid", "50", "TRY", "1", TxType::Collection),
    ];
    // start > end: opening still accumulates everything before start
    let tb = reports::trial_balance(&txs, &projects, d("2024-03-01"), d("2024-02-01"));
    let e = &tb.entries[0];
    assert_eq!(e.opening_debit, dec("100"));
    assert_eq!(e.opening_credit, dec("50"));
    assert_eq!(e.period_debit, Decimal::ZERO);
    assert_eq!(e.period_credit, Decimal::ZERO);
    assert_eq!(e.closing_debit, dec("100"));
}

#[test]
fn builders_are_pure_and_repeatable() {
    let projects = vec![project(1, "A1", "Alpha")];
    let txs = vec![
        tx(1, 1, "2024-01-05", "a", "100", "USD", "30", TxType::Payment),
        tx(2, 1, "2024-02-10", "b", "40", "TRY", "1", TxType::Collection),
    ];
    let s = d("2024-02-01");
    let e = d("2024-02-28");

    let tb1 = reports::trial_balance(&txs, &projects, s, e);
    let tb2 = reports::trial_balance(&txs, &projects, s, e);
    assert_eq!(
        serde_json::to_string(&tb1).unwrap(),
        serde_json::to_string(&tb2).unwrap()
    );

    let l1 = reports::ledger(&txs, &projects, 1, s, e, "TRY").unwrap();
    let l2 = reports::ledger(&txs, &projects, 1, s, e, "TRY").unwrap();
    assert_eq!(
        serde_json::to_string(&l1).unwrap(),
        serde_json::to_string(&l2).unwrap()
    );
}
