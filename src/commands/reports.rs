// Copyright (c) 2025 Defter Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{load_projects, load_transactions};
use crate::reports::{self, LedgerEntry, TrialBalance};
use crate::utils::{fmt_amount, get_home_currency, id_for_project, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("trial-balance", sub)) => trial_balance(conn, sub)?,
        Some(("ledger", sub)) => ledger(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn trial_balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let start = parse_date(sub.get_one::<String>("start").unwrap())?;
    let end = parse_date(sub.get_one::<String>("end").unwrap())?;

    let projects = load_projects(conn)?;
    let transactions = load_transactions(conn)?;
    let home = get_home_currency(conn)?;
    let tb = reports::trial_balance(&transactions, &projects, start, end);

    if !maybe_print_json(json_flag, jsonl_flag, &tb)? {
        println!("{}", trial_balance_table(&tb, &home));
    }
    if tb.skipped > 0 {
        eprintln!(
            "note: {} transaction(s) reference unknown projects and were skipped",
            tb.skipped
        );
    }
    Ok(())
}

fn trial_balance_table(tb: &TrialBalance, home: &str) -> comfy_table::Table {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(tb.entries.len() + 1);
    let mut totals = vec![Decimal::ZERO; 12];
    for e in &tb.entries {
        let cols = [
            e.opening_debit,
            e.opening_credit,
            e.period_debit,
            e.period_credit,
            e.closing_debit,
            e.closing_credit,
            e.home_opening_debit,
            e.home_opening_credit,
            e.home_period_debit,
            e.home_period_credit,
            e.home_closing_debit,
            e.home_closing_credit,
        ];
        for (t, c) in totals.iter_mut().zip(cols.iter()) {
            *t += *c;
        }
        let mut row = vec![e.project_code.clone(), e.project_name.clone()];
        row.extend(cols.iter().map(fmt_amount));
        rows.push(row);
    }
    let mut total_row = vec!["".to_string(), "TOTAL".to_string()];
    total_row.extend(totals.iter().map(fmt_amount));
    rows.push(total_row);

    let h = |s: &str| format!("{} ({})", s, home);
    pretty_table(
        &[
            "Code",
            "Project",
            "Opening Dr",
            "Opening Cr",
            "Period Dr",
            "Period Cr",
            "Closing Dr",
            "Closing Cr",
            &h("Opening Dr"),
            &h("Opening Cr"),
            &h("Period Dr"),
            &h("Period Cr"),
            &h("Closing Dr"),
            &h("Closing Cr"),
        ],
        rows,
    )
}

fn ledger(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let code = sub.get_one::<String>("project").unwrap();
    let start = parse_date(sub.get_one::<String>("start").unwrap())?;
    let end = parse_date(sub.get_one::<String>("end").unwrap())?;

    let project_id = id_for_project(conn, code)?;
    let projects = load_projects(conn)?;
    let transactions = load_transactions(conn)?;
    let home = get_home_currency(conn)?;
    let entries = reports::ledger(&transactions, &projects, project_id, start, end, &home)?;

    if !maybe_print_json(json_flag, jsonl_flag, &entries)? {
        println!("{}", ledger_table(&entries, &home));
    }
    Ok(())
}

fn ledger_table(entries: &[LedgerEntry], home: &str) -> comfy_table::Table {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(entries.len() + 1);
    let mut debit_total = Decimal::ZERO;
    let mut credit_total = Decimal::ZERO;
    let mut home_debit_total = Decimal::ZERO;
    let mut home_credit_total = Decimal::ZERO;
    for e in entries {
        debit_total += e.debit;
        credit_total += e.credit;
        home_debit_total += e.home.debit;
        home_credit_total += e.home.credit;
        rows.push(vec![
            e.date.to_string(),
            e.description.clone(),
            fmt_amount(&e.debit),
            fmt_amount(&e.credit),
            fmt_amount(&e.balance),
            e.currency.clone(),
            fmt_amount(&e.home.debit),
            fmt_amount(&e.home.credit),
            fmt_amount(&e.home.balance),
        ]);
    }
    let (balance, home_balance) = entries
        .last()
        .map(|e| (e.balance, e.home.balance))
        .unwrap_or((Decimal::ZERO, Decimal::ZERO));
    rows.push(vec![
        "".to_string(),
        "TOTAL".to_string(),
        fmt_amount(&debit_total),
        fmt_amount(&credit_total),
        fmt_amount(&balance),
        home.to_string(),
        fmt_amount(&home_debit_total),
        fmt_amount(&home_credit_total),
        fmt_amount(&home_balance),
    ]);

    let h = |s: &str| format!("{} ({})", s, home);
    pretty_table(
        &[
            "Date",
            "Description",
            "Debit",
            "Credit",
            "Balance",
            "CCY",
            &h("Debit"),
            &h("Credit"),
            &h("Balance"),
        ],
        rows,
    )
}
