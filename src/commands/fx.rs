// Copyright (c) 2025 Defter Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    get_home_currency, http_client, parse_date, parse_decimal, pretty_table, set_home_currency,
};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Deserialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-home", sub)) => {
            let ccy = sub.get_one::<String>("currency").unwrap().to_uppercase();
            set_home_currency(conn, &ccy)?;
            println!("Home currency set to {}", ccy);
        }
        Some(("set", sub)) => set_rate(conn, sub)?,
        Some(("fetch", sub)) => {
            let days: usize = *sub.get_one::<usize>("days").unwrap_or(&30);
            fetch_rates(conn, days)?;
        }
        Some(("list", _)) => list_rates(conn)?,
        _ => {}
    }
    Ok(())
}

fn set_rate(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ccy = sub.get_one::<String>("currency").unwrap().to_uppercase();
    let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Utc::now().date_naive(),
    };
    let home = get_home_currency(conn)?;
    conn.execute(
        "INSERT INTO fx_rates(date, currency, rate) VALUES (?1, ?2, ?3)
         ON CONFLICT(date, currency) DO UPDATE SET rate=excluded.rate",
        params![date.to_string(), ccy, rate.to_string()],
    )?;
    println!("Stored rate: 1 {} = {} {} on {}", ccy, rate, home, date);
    Ok(())
}

fn distinct_currencies(conn: &Connection) -> Result<Vec<String>> {
    let mut out = Vec::<String>::new();
    for sql in [
        "SELECT DISTINCT currency FROM projects",
        "SELECT DISTINCT currency FROM transactions",
    ] {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
        for row in rows {
            let c: String = row?;
            if !c.is_empty() && !out.contains(&c) {
                out.push(c);
            }
        }
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
struct Series {
    rates: std::collections::HashMap<String, std::collections::HashMap<String, f64>>,
    #[serde(rename = "base")]
    _base: String,
}

fn fetch_rates(conn: &Connection, days: usize) -> Result<()> {
    let home = get_home_currency(conn)?;
    let today = Utc::now().date_naive();
    let start = today - chrono::Duration::days(days as i64);
    let ccy_list = distinct_currencies(conn)?;
    let targets: Vec<String> = ccy_list.into_iter().filter(|c| c != &home).collect();
    if targets.is_empty() {
        println!("No foreign currencies found; nothing to fetch.");
        return Ok(());
    }
    let to_param = targets.join(",");
    let url = format!("https://api.frankfurter.dev/{start}..{today}?from={home}&to={to_param}");
    let client = http_client()?;
    let resp = client.get(url).send()?.error_for_status()?;
    let s: Series = resp.json()?;
    for (date, mp) in s.rates {
        for (quote, rate) in mp {
            // Frankfurter quotes home->foreign; we store home units per 1
            // unit of the foreign currency, so invert.
            let quoted = Decimal::try_from(rate)
                .with_context(|| format!("Invalid rate '{}' for {}", rate, quote))?;
            if quoted.is_zero() {
                continue;
            }
            let inverted = Decimal::ONE / quoted;
            conn.execute(
                "INSERT OR IGNORE INTO fx_rates(date, currency, rate) VALUES (?1, ?2, ?3)",
                params![date, quote, inverted.to_string()],
            )?;
        }
    }
    println!("FX rates fetched via Frankfurter (ECB).");
    Ok(())
}

fn list_rates(conn: &Connection) -> Result<()> {
    let home = get_home_currency(conn)?;
    let mut stmt = conn
        .prepare("SELECT date, currency, rate FROM fx_rates ORDER BY date DESC, currency LIMIT 50")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (d, c, r) = row?;
        data.push(vec![d, c, r]);
    }
    let hdr = format!("Rate ({}/unit)", home);
    println!("{}", pretty_table(&["Date", "Currency", &hdr], data));
    Ok(())
}
