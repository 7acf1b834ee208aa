// Copyright (c) 2025 Defter Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

use crate::models::{Project, Transaction};
use crate::utils::{parse_date, parse_decimal};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.defterhq", "Defter", "defter"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("defter.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS projects(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        code TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        client TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        total_amount TEXT NOT NULL DEFAULT '0',
        currency TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        description TEXT NOT NULL,
        amount TEXT NOT NULL,
        currency TEXT NOT NULL,
        exchange_rate TEXT NOT NULL DEFAULT '1',
        home_value TEXT NOT NULL,
        tx_type TEXT NOT NULL CHECK(tx_type IN ('collection','payment')),
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(project_id) REFERENCES projects(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    CREATE INDEX IF NOT EXISTS idx_transactions_project ON transactions(project_id);

    -- Rates: home units per 1 unit of currency, per day
    CREATE TABLE IF NOT EXISTS fx_rates(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        currency TEXT NOT NULL,
        rate TEXT NOT NULL,
        UNIQUE(date, currency)
    );
    "#,
    )?;
    Ok(())
}

/// Current project roster, in creation order. Reports preserve this order.
pub fn load_projects(conn: &Connection) -> Result<Vec<Project>> {
    let mut stmt = conn.prepare(
        "SELECT id, code, name, client, start_date, end_date, total_amount, currency
         FROM projects ORDER BY id",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let start: String = r.get(4)?;
        let end: String = r.get(5)?;
        let total: String = r.get(6)?;
        out.push(Project {
            id: r.get(0)?,
            code: r.get(1)?,
            name: r.get(2)?,
            client: r.get(3)?,
            start_date: parse_date(&start)?,
            end_date: parse_date(&end)?,
            total_amount: parse_decimal(&total)?,
            currency: r.get(7)?,
        });
    }
    Ok(out)
}

/// Full transaction log, ordered by date then insertion id so that same-date
/// rows keep entry order through the ledger's stable sort.
pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, project_id, date, description, amount, currency, exchange_rate, home_value, tx_type
         FROM transactions ORDER BY date, id",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(2)?;
        let amount: String = r.get(4)?;
        let rate: String = r.get(6)?;
        let home_value: String = r.get(7)?;
        let tx_type: String = r.get(8)?;
        out.push(Transaction {
            id: r.get(0)?,
            project_id: r.get(1)?,
            date: parse_date(&date)?,
            description: r.get(3)?,
            amount: parse_decimal(&amount)?,
            currency: r.get(5)?,
            exchange_rate: parse_decimal(&rate)?,
            home_value: parse_decimal(&home_value)?,
            tx_type: tx_type.parse()?,
        });
    }
    Ok(out)
}
