// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

/// Fallback USD->INR rate for rows that predate the exchange-rate column.
pub const DEFAULT_EXCHANGE_RATE: Decimal = Decimal::from_parts(8350, 0, 0, false, 2);

/// Application configuration, loaded from the settings table and passed
/// explicitly into the engine and hash utility.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secret key for integrity tags. Minted once on first load and kept in
    /// the settings table.
    pub integrity_secret: String,
    pub default_exchange_rate: Decimal,
}

impl Config {
    pub fn load(conn: &Connection) -> Result<Config> {
        let integrity_secret = match get_setting(conn, "integrity_secret")? {
            Some(s) => s,
            None => {
                let minted = uuid::Uuid::new_v4().simple().to_string();
                set_setting(conn, "integrity_secret", &minted)?;
                minted
            }
        };
        let default_exchange_rate = match get_setting(conn, "default_exchange_rate")? {
            Some(s) => s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid default exchange rate '{}' in settings", s))?,
            None => DEFAULT_EXCHANGE_RATE,
        };
        Ok(Config {
            integrity_secret,
            default_exchange_rate,
        })
    }
}

fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn set_default_exchange_rate(conn: &Connection, rate: Decimal) -> Result<()> {
    set_setting(conn, "default_exchange_rate", &rate.to_string())
}

pub fn set_integrity_secret(conn: &Connection, secret: &str) -> Result<()> {
    set_setting(conn, "integrity_secret", secret)
}
