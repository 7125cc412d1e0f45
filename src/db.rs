// Copyright (c) 2025 Soumyadip Sarkar.
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

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Caratclip", "caratclip"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("caratclip.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- Purchases and sales share one row shape; amounts are decimal text,
    -- dates are YYYY-MM-DD text, partial_payments is a JSON array.
    CREATE TABLE IF NOT EXISTS purchases(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT,
        party TEXT,
        description TEXT,
        stone_id TEXT,
        kapan_no TEXT,
        carat TEXT,
        quantity INTEGER,
        price_per_carat_usd TEXT,
        price_per_carat_inr TEXT,
        total_amount_usd TEXT,
        total_amount_inr TEXT,
        exchange_rate TEXT,
        payment_status TEXT NOT NULL DEFAULT 'Pending',
        payment_done_date TEXT,
        payment_reference TEXT,
        payment_due_date TEXT,
        payment_notes TEXT,
        partial_payments TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_purchases_date ON purchases(date);

    CREATE TABLE IF NOT EXISTS sales(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT,
        party TEXT,
        description TEXT,
        stone_id TEXT,
        kapan_no TEXT,
        carat TEXT,
        quantity INTEGER,
        price_per_carat_usd TEXT,
        price_per_carat_inr TEXT,
        total_amount_usd TEXT,
        total_amount_inr TEXT,
        exchange_rate TEXT,
        payment_status TEXT NOT NULL DEFAULT 'Pending',
        payment_done_date TEXT,
        payment_reference TEXT,
        payment_due_date TEXT,
        payment_notes TEXT,
        partial_payments TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_sales_date ON sales(date);

    CREATE TABLE IF NOT EXISTS inventory(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        item_id TEXT NOT NULL UNIQUE,
        description TEXT,
        shape TEXT,
        carat TEXT,
        status TEXT NOT NULL DEFAULT 'In Stock',
        location TEXT,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}
