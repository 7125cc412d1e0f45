// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction store: purchase/sale rows addressed by position within their
//! table, the way the original ledgers were addressed by row index. Deleting
//! a row shifts the indices after it.

use crate::ledger::LedgerError;
use crate::models::{PaymentEvent, PaymentStatus, RecordKind, TransactionRecord};
use crate::utils::parse_date;
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

const COLUMNS: &str = "date, party, description, stone_id, kapan_no, carat, quantity, \
    price_per_carat_usd, price_per_carat_inr, total_amount_usd, total_amount_inr, \
    exchange_rate, payment_status, payment_done_date, payment_reference, \
    payment_due_date, payment_notes, partial_payments";

pub fn count_records(conn: &Connection, kind: RecordKind) -> Result<usize> {
    let n: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", kind.table()),
        [],
        |r| r.get(0),
    )?;
    Ok(n as usize)
}

/// Loads the record at `index`, failing closed with `NotFound` when the index
/// does not resolve.
pub fn load_record(conn: &Connection, kind: RecordKind, index: usize) -> Result<TransactionRecord> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY id LIMIT 1 OFFSET ?1",
        COLUMNS,
        kind.table()
    );
    let raw = conn
        .query_row(&sql, params![index as i64], read_raw)
        .optional()?;
    match raw {
        Some(raw) => from_raw(raw),
        None => Err(LedgerError::NotFound(format!("{} record {}", kind, index)).into()),
    }
}

/// Overwrites the record at `index` with `record`.
pub fn save_record(
    conn: &Connection,
    kind: RecordKind,
    index: usize,
    record: &TransactionRecord,
) -> Result<()> {
    let id = id_at_index(conn, kind, index)?;
    let sql = format!(
        "UPDATE {} SET date=?1, party=?2, description=?3, stone_id=?4, kapan_no=?5, \
         carat=?6, quantity=?7, price_per_carat_usd=?8, price_per_carat_inr=?9, \
         total_amount_usd=?10, total_amount_inr=?11, exchange_rate=?12, \
         payment_status=?13, payment_done_date=?14, payment_reference=?15, \
         payment_due_date=?16, payment_notes=?17, partial_payments=?18 WHERE id=?19",
        kind.table()
    );
    conn.execute(
        &sql,
        params![
            record.date.map(|d| d.to_string()),
            record.party,
            record.description,
            record.stone_id,
            record.kapan_no,
            record.carat.map(|d| d.to_string()),
            record.quantity,
            record.price_per_carat_usd.map(|d| d.to_string()),
            record.price_per_carat_inr.map(|d| d.to_string()),
            record.total_amount_usd.map(|d| d.to_string()),
            record.total_amount_inr.map(|d| d.to_string()),
            record.exchange_rate.map(|d| d.to_string()),
            record.payment_status.to_string(),
            record.payment_done_date.map(|d| d.to_string()),
            record.payment_reference,
            record.payment_due_date.map(|d| d.to_string()),
            record.payment_notes,
            history_json(&record.partial_payments)?,
            id,
        ],
    )?;
    Ok(())
}

/// Appends a new record and returns its row index.
pub fn append_record(
    conn: &Connection,
    kind: RecordKind,
    record: &TransactionRecord,
) -> Result<usize> {
    let sql = format!(
        "INSERT INTO {}({}) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18)",
        kind.table(),
        COLUMNS
    );
    conn.execute(
        &sql,
        params![
            record.date.map(|d| d.to_string()),
            record.party,
            record.description,
            record.stone_id,
            record.kapan_no,
            record.carat.map(|d| d.to_string()),
            record.quantity,
            record.price_per_carat_usd.map(|d| d.to_string()),
            record.price_per_carat_inr.map(|d| d.to_string()),
            record.total_amount_usd.map(|d| d.to_string()),
            record.total_amount_inr.map(|d| d.to_string()),
            record.exchange_rate.map(|d| d.to_string()),
            record.payment_status.to_string(),
            record.payment_done_date.map(|d| d.to_string()),
            record.payment_reference,
            record.payment_due_date.map(|d| d.to_string()),
            record.payment_notes,
            history_json(&record.partial_payments)?,
        ],
    )?;
    Ok(count_records(conn, kind)? - 1)
}

pub fn delete_record(conn: &Connection, kind: RecordKind, index: usize) -> Result<()> {
    let id = id_at_index(conn, kind, index)?;
    conn.execute(
        &format!("DELETE FROM {} WHERE id=?1", kind.table()),
        params![id],
    )?;
    Ok(())
}

pub fn list_records(conn: &Connection, kind: RecordKind) -> Result<Vec<TransactionRecord>> {
    let sql = format!("SELECT {} FROM {} ORDER BY id", COLUMNS, kind.table());
    let mut stmt = conn.prepare(&sql)?;
    let raws = stmt.query_map([], read_raw)?;
    let mut out = Vec::new();
    for raw in raws {
        out.push(from_raw(raw?)?);
    }
    Ok(out)
}

fn id_at_index(conn: &Connection, kind: RecordKind, index: usize) -> Result<i64> {
    let sql = format!(
        "SELECT id FROM {} ORDER BY id LIMIT 1 OFFSET ?1",
        kind.table()
    );
    let id: Option<i64> = conn
        .query_row(&sql, params![index as i64], |r| r.get(0))
        .optional()?;
    id.ok_or_else(|| LedgerError::NotFound(format!("{} record {}", kind, index)).into())
}

struct RawRow {
    date: Option<String>,
    party: Option<String>,
    description: Option<String>,
    stone_id: Option<String>,
    kapan_no: Option<String>,
    carat: Option<String>,
    quantity: Option<i64>,
    price_per_carat_usd: Option<String>,
    price_per_carat_inr: Option<String>,
    total_amount_usd: Option<String>,
    total_amount_inr: Option<String>,
    exchange_rate: Option<String>,
    payment_status: String,
    payment_done_date: Option<String>,
    payment_reference: Option<String>,
    payment_due_date: Option<String>,
    payment_notes: Option<String>,
    partial_payments: Option<String>,
}

fn read_raw(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        date: r.get(0)?,
        party: r.get(1)?,
        description: r.get(2)?,
        stone_id: r.get(3)?,
        kapan_no: r.get(4)?,
        carat: r.get(5)?,
        quantity: r.get(6)?,
        price_per_carat_usd: r.get(7)?,
        price_per_carat_inr: r.get(8)?,
        total_amount_usd: r.get(9)?,
        total_amount_inr: r.get(10)?,
        exchange_rate: r.get(11)?,
        payment_status: r.get(12)?,
        payment_done_date: r.get(13)?,
        payment_reference: r.get(14)?,
        payment_due_date: r.get(15)?,
        payment_notes: r.get(16)?,
        partial_payments: r.get(17)?,
    })
}

fn from_raw(raw: RawRow) -> Result<TransactionRecord> {
    Ok(TransactionRecord {
        date: opt_date(raw.date)?,
        party: raw.party,
        description: raw.description,
        stone_id: raw.stone_id,
        kapan_no: raw.kapan_no,
        carat: opt_decimal(raw.carat, "carat")?,
        quantity: raw.quantity,
        price_per_carat_usd: opt_decimal(raw.price_per_carat_usd, "price_per_carat_usd")?,
        price_per_carat_inr: opt_decimal(raw.price_per_carat_inr, "price_per_carat_inr")?,
        total_amount_usd: opt_decimal(raw.total_amount_usd, "total_amount_usd")?,
        total_amount_inr: opt_decimal(raw.total_amount_inr, "total_amount_inr")?,
        exchange_rate: opt_decimal(raw.exchange_rate, "exchange_rate")?,
        payment_status: raw.payment_status.parse::<PaymentStatus>()?,
        payment_done_date: opt_date(raw.payment_done_date)?,
        payment_reference: raw.payment_reference,
        payment_due_date: opt_date(raw.payment_due_date)?,
        payment_notes: raw.payment_notes,
        partial_payments: parse_history(raw.partial_payments.as_deref()),
    })
}

fn opt_decimal(v: Option<String>, col: &str) -> Result<Option<Decimal>> {
    v.map(|s| {
        s.parse::<Decimal>()
            .with_context(|| format!("Invalid decimal '{}' in column {}", s, col))
    })
    .transpose()
}

fn opt_date(v: Option<String>) -> Result<Option<chrono::NaiveDate>> {
    v.map(|s| parse_date(&s)).transpose()
}

/// Malformed history JSON in an old row degrades to an empty history rather
/// than making the record unreadable.
fn parse_history(v: Option<&str>) -> Vec<PaymentEvent> {
    match v {
        Some(s) if !s.is_empty() => serde_json::from_str(s).unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn history_json(events: &[PaymentEvent]) -> Result<Option<String>> {
    if events.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::to_string(events)?))
    }
}
