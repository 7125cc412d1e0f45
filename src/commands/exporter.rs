// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::RecordKind;
use crate::store;
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("records", sub)) => export_records(conn, sub),
        Some(("inventory", sub)) => export_inventory(conn, sub),
        _ => Ok(()),
    }
}

fn export_records(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind: RecordKind = sub.get_one::<String>("kind").unwrap().parse()?;
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let records = store::list_records(conn, kind)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "party",
                "description",
                "stone_id",
                "kapan_no",
                "carat",
                "quantity",
                "total_amount_usd",
                "total_amount_inr",
                "exchange_rate",
                "payment_status",
                "payment_done_date",
            ])?;
            let dec = |v: Option<rust_decimal::Decimal>| {
                v.map(|d| d.to_string()).unwrap_or_default()
            };
            for r in &records {
                wtr.write_record([
                    r.date.map(|d| d.to_string()).unwrap_or_default(),
                    r.party.clone().unwrap_or_default(),
                    r.description.clone().unwrap_or_default(),
                    r.stone_id.clone().unwrap_or_default(),
                    r.kapan_no.clone().unwrap_or_default(),
                    dec(r.carat),
                    r.quantity.map(|q| q.to_string()).unwrap_or_default(),
                    dec(r.total_amount_usd),
                    dec(r.total_amount_inr),
                    dec(r.exchange_rate),
                    r.payment_status.to_string(),
                    r.payment_done_date
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            // JSON keeps the full rows, payment history included.
            std::fs::write(out, serde_json::to_string_pretty(&records)?)?;
        }
        _ => anyhow::bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} {} records to {}", records.len(), kind, out);
    Ok(())
}

fn export_inventory(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT item_id, description, shape, carat, status, location, notes
         FROM inventory ORDER BY item_id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<String>>(6)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "item_id",
                "description",
                "shape",
                "carat",
                "status",
                "location",
                "notes",
            ])?;
            for row in rows {
                let (id, desc, shape, carat, status, loc, notes) = row?;
                wtr.write_record([
                    id,
                    desc.unwrap_or_default(),
                    shape.unwrap_or_default(),
                    carat.unwrap_or_default(),
                    status,
                    loc.unwrap_or_default(),
                    notes.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (id, desc, shape, carat, status, loc, notes) = row?;
                items.push(json!({
                    "item_id": id, "description": desc, "shape": shape, "carat": carat,
                    "status": status, "location": loc, "notes": notes
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => anyhow::bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported inventory to {}", out);
    Ok(())
}
