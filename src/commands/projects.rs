// Copyright (c) 2025 Defter Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    fmt_amount, get_home_currency, maybe_print_json, parse_date, parse_decimal, pretty_table,
};
use anyhow::Result;
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let code = sub.get_one::<String>("code").unwrap();
    let name = sub.get_one::<String>("name").unwrap();
    let client = sub.get_one::<String>("client").unwrap();
    let start = parse_date(sub.get_one::<String>("start").unwrap())?;
    let end = parse_date(sub.get_one::<String>("end").unwrap())?;
    let total = parse_decimal(sub.get_one::<String>("total").unwrap())?;
    let ccy = match sub.get_one::<String>("currency") {
        Some(c) => c.to_uppercase(),
        None => get_home_currency(conn)?,
    };

    conn.execute(
        "INSERT INTO projects(code, name, client, start_date, end_date, total_amount, currency)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            code,
            name,
            client,
            start.to_string(),
            end.to_string(),
            total.to_string(),
            ccy
        ],
    )?;
    println!("Added project '{}' ({}, {})", code, name, ccy);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let projects = crate::db::load_projects(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &projects)? {
        let rows: Vec<Vec<String>> = projects
            .iter()
            .map(|p| {
                vec![
                    p.code.clone(),
                    p.name.clone(),
                    p.client.clone(),
                    p.start_date.to_string(),
                    p.end_date.to_string(),
                    fmt_amount(&p.total_amount),
                    p.currency.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Code", "Name", "Client", "Start", "End", "Total", "CCY"],
                rows,
            )
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let code = sub.get_one::<String>("code").unwrap();
    // ON DELETE CASCADE drops the project's transactions with it
    let n = conn.execute("DELETE FROM projects WHERE code=?1", params![code])?;
    if n == 0 {
        println!("No project with code '{}'", code);
    } else {
        println!("Removed project '{}' and its transactions", code);
    }
    Ok(())
}
