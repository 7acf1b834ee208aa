// Copyright (c) 2025 Defter Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use crate::db::{load_projects, load_transactions};
use crate::reports::{self, LedgerEntry, TrialBalance};
use crate::utils::{get_home_currency, id_for_project, parse_date};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("trial-balance", sub)) => export_trial_balance(conn, sub),
        Some(("ledger", sub)) => export_ledger(conn, sub),
        _ => Ok(()),
    }
}

fn export_trial_balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let start = parse_date(sub.get_one::<String>("start").unwrap())?;
    let end = parse_date(sub.get_one::<String>("end").unwrap())?;

    let projects = load_projects(conn)?;
    let transactions = load_transactions(conn)?;
    let tb = reports::trial_balance(&transactions, &projects, start, end);

    match fmt.as_str() {
        "csv" => write_trial_balance_csv(&tb, out)?,
        "json" => std::fs::write(out, serde_json::to_string_pretty(&tb)?)?,
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported trial balance to {}", out);
    Ok(())
}

fn export_ledger(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let code = sub.get_one::<String>("project").unwrap();
    let start = parse_date(sub.get_one::<String>("start").unwrap())?;
    let end = parse_date(sub.get_one::<String>("end").unwrap())?;

    let project_id = id_for_project(conn, code)?;
    let projects = load_projects(conn)?;
    let transactions = load_transactions(conn)?;
    let home = get_home_currency(conn)?;
    let entries = reports::ledger(&transactions, &projects, project_id, start, end, &home)?;

    match fmt.as_str() {
        "csv" => write_ledger_csv(&entries, out)?,
        "json" => std::fs::write(out, serde_json::to_string_pretty(&entries)?)?,
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported ledger for '{}' to {}", code, out);
    Ok(())
}

pub fn write_trial_balance_csv<P: AsRef<Path>>(tb: &TrialBalance, out: P) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out)?;
    wtr.write_record([
        "project_code",
        "project_name",
        "opening_debit",
        "opening_credit",
        "period_debit",
        "period_credit",
        "closing_debit",
        "closing_credit",
        "home_opening_debit",
        "home_opening_credit",
        "home_period_debit",
        "home_period_credit",
        "home_closing_debit",
        "home_closing_credit",
    ])?;
    for e in &tb.entries {
        wtr.write_record([
            e.project_code.clone(),
            e.project_name.clone(),
            e.opening_debit.to_string(),
            e.opening_credit.to_string(),
            e.period_debit.to_string(),
            e.period_credit.to_string(),
            e.closing_debit.to_string(),
            e.closing_credit.to_string(),
            e.home_opening_debit.to_string(),
            e.home_opening_credit.to_string(),
            e.home_period_debit.to_string(),
            e.home_period_credit.to_string(),
            e.home_closing_debit.to_string(),
            e.home_closing_credit.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_ledger_csv<P: AsRef<Path>>(entries: &[LedgerEntry], out: P) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out)?;
    wtr.write_record([
        "date",
        "description",
        "debit",
        "credit",
        "balance",
        "currency",
        "home_debit",
        "home_credit",
        "home_balance",
    ])?;
    for e in entries {
        wtr.write_record([
            e.date.to_string(),
            e.description.clone(),
            e.debit.to_string(),
            e.credit.to_string(),
            e.balance.to_string(),
            e.currency.clone(),
            e.home.debit.to_string(),
            e.home.credit.to_string(),
            e.home.balance.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
