// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::InventoryItem;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};

const STATUSES: [&str; 3] = ["In Stock", "Sold", "Reserved"];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("set-status", sub)) => set_status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn normalize_status(s: &str) -> Result<&'static str> {
    STATUSES
        .iter()
        .find(|v| v.eq_ignore_ascii_case(s))
        .copied()
        .ok_or_else(|| anyhow::anyhow!("Invalid status '{}', expected one of {:?}", s, STATUSES))
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let item_id = sub.get_one::<String>("item-id").unwrap().trim().to_string();
    if item_id.is_empty() {
        bail!("Item id must not be empty");
    }
    let carat = sub
        .get_one::<String>("carat")
        .map(|s| parse_decimal(s))
        .transpose()?;
    let status = normalize_status(sub.get_one::<String>("status").unwrap())?;

    conn.execute(
        "INSERT INTO inventory(item_id, description, shape, carat, status, location, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            item_id,
            sub.get_one::<String>("description"),
            sub.get_one::<String>("shape"),
            carat.map(|d| d.to_string()),
            status,
            sub.get_one::<String>("location"),
            sub.get_one::<String>("notes"),
        ],
    )?;
    println!("Added inventory item '{}' ({})", item_id, status);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut sql = String::from(
        "SELECT item_id, description, shape, carat, status, location, notes FROM inventory",
    );
    let status = sub
        .get_one::<String>("status")
        .map(|s| normalize_status(s))
        .transpose()?;
    if status.is_some() {
        sql.push_str(" WHERE status=?1");
    }
    sql.push_str(" ORDER BY item_id");

    let mut stmt = conn.prepare(&sql)?;
    let map = |r: &rusqlite::Row<'_>| -> rusqlite::Result<(String, Option<String>, Option<String>, Option<String>, String, Option<String>, Option<String>)> {
        Ok((
            r.get(0)?,
            r.get(1)?,
            r.get(2)?,
            r.get(3)?,
            r.get(4)?,
            r.get(5)?,
            r.get(6)?,
        ))
    };
    let rows = if let Some(s) = status {
        stmt.query_map(params![s], map)?
    } else {
        stmt.query_map([], map)?
    };

    let mut items = Vec::new();
    for row in rows {
        let (item_id, description, shape, carat, status, location, notes) = row?;
        items.push(InventoryItem {
            item_id,
            description,
            shape,
            carat: carat.map(|s| parse_decimal(&s)).transpose()?,
            status,
            location,
            notes,
        });
    }

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        let rows: Vec<Vec<String>> = items
            .iter()
            .map(|i| {
                vec![
                    i.item_id.clone(),
                    i.description.clone().unwrap_or_default(),
                    i.shape.clone().unwrap_or_default(),
                    i.carat.map(|d| d.to_string()).unwrap_or_default(),
                    i.status.clone(),
                    i.location.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Item", "Description", "Shape", "Carat", "Status", "Location"],
                rows
            )
        );
    }
    Ok(())
}

fn set_status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let item_id = sub.get_one::<String>("item-id").unwrap();
    let status = normalize_status(sub.get_one::<String>("status").unwrap())?;
    let changed = conn.execute(
        "UPDATE inventory SET status=?1 WHERE item_id=?2",
        params![status, item_id],
    )?;
    if changed == 0 {
        bail!("Inventory item '{}' not found", item_id);
    }
    println!("Inventory item '{}' marked {}", item_id, status);
    Ok(())
}
