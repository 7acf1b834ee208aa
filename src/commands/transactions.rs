// Copyright (c) 2025 Defter Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    fmt_amount, get_home_currency, id_for_project, maybe_print_json, parse_date, parse_decimal,
    pretty_table, rate_on_or_before,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Rate used to value a transaction at entry time, in home units per 1 unit
/// of `currency`. An explicit rate wins; otherwise the latest stored rate on
/// or before the transaction date; home-currency transactions are always 1.
pub fn resolve_rate(
    conn: &Connection,
    currency: &str,
    home: &str,
    date: NaiveDate,
    explicit: Option<Decimal>,
) -> Result<Decimal> {
    if currency == home {
        return Ok(Decimal::ONE);
    }
    if let Some(r) = explicit {
        return Ok(r);
    }
    rate_on_or_before(conn, currency, date)?.with_context(|| {
        format!(
            "No stored rate for {} on or before {}; pass --rate or run 'fx set'",
            currency, date
        )
    })
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let project_code = sub.get_one::<String>("project").unwrap();
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let tx_type = sub.get_one::<String>("type").unwrap();
    let home = get_home_currency(conn)?;
    let currency = match sub.get_one::<String>("currency") {
        Some(c) => c.to_uppercase(),
        None => home.clone(),
    };
    let explicit = sub
        .get_one::<String>("rate")
        .map(|s| parse_decimal(s))
        .transpose()?;

    let rate = resolve_rate(conn, &currency, &home, date, explicit)?;
    let home_value = amount * rate;

    let project_id = id_for_project(conn, project_code)?;
    conn.execute(
        "INSERT INTO transactions(project_id, date, description, amount, currency, exchange_rate, home_value, tx_type)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            project_id,
            date.to_string(),
            description,
            amount.to_string(),
            currency,
            rate.to_string(),
            home_value.to_string(),
            tx_type
        ],
    )?;
    println!(
        "Recorded {} of {} {} on {} for '{}' ({} {} at rate {})",
        tx_type,
        amount,
        currency,
        date,
        project_code,
        fmt_amount(&home_value),
        home,
        rate
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.project.clone(),
                    r.description.clone(),
                    r.tx_type.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.home_value.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Project", "Description", "Type", "Amount", "CCY", "Home value"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub date: String,
    pub project: String,
    pub description: String,
    pub tx_type: String,
    pub amount: String,
    pub currency: String,
    pub home_value: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.date, p.code, t.description, t.tx_type, t.amount, t.currency, t.home_value
         FROM transactions t LEFT JOIN projects p ON t.project_id=p.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(code) = sub.get_one::<String>("project") {
        sql.push_str(" AND p.code=?");
        params_vec.push(code.into());
    }
    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(month.into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(0)?;
        let project: Option<String> = r.get(1)?;
        let description: String = r.get(2)?;
        let tx_type: String = r.get(3)?;
        let amount: String = r.get(4)?;
        let currency: String = r.get(5)?;
        let home_value: String = r.get(6)?;
        data.push(TransactionRow {
            date,
            project: project.unwrap_or_default(),
            description,
            tx_type,
            amount,
            currency,
            home_value,
        });
    }
    Ok(data)
}
