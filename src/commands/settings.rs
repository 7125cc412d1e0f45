// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{self, Config};
use crate::utils::{parse_decimal, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(conn)?,
        Some(("set-rate", sub)) => {
            let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
            if rate <= Decimal::ZERO {
                bail!("Exchange rate must be greater than 0");
            }
            config::set_default_exchange_rate(conn, rate)?;
            println!("Default exchange rate set to {}", rate);
        }
        Some(("set-secret", sub)) => {
            let secret = sub.get_one::<String>("secret").unwrap();
            if secret.trim().is_empty() {
                bail!("Secret must not be empty");
            }
            config::set_integrity_secret(conn, secret.trim())?;
            println!("Integrity secret replaced; previously issued tags no longer verify.");
        }
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection) -> Result<()> {
    let cfg = Config::load(conn)?;
    let masked = if cfg.integrity_secret.chars().count() > 4 {
        let head: String = cfg.integrity_secret.chars().take(4).collect();
        format!("{}...", head)
    } else {
        "(set)".to_string()
    };
    println!(
        "{}",
        pretty_table(
            &["Setting", "Value"],
            vec![
                vec![
                    "default_exchange_rate".into(),
                    cfg.default_exchange_rate.to_string()
                ],
                vec!["integrity_secret".into(), masked],
            ],
        )
    );
    Ok(())
}
