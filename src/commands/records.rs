// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::models::{Balances, PaymentStatus, RecordKind, TransactionRecord};
use crate::utils::{maybe_print_json, pretty_table};
use crate::{integrity, ledger, store};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("delete", sub)) => delete(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct RecordRow {
    pub kind: String,
    pub index: usize,
    pub date: String,
    pub party: String,
    pub description: String,
    pub carat: String,
    pub total_usd: String,
    pub total_inr: String,
    pub rate: String,
    pub status: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<RecordRow>> {
    let kinds: Vec<RecordKind> = match sub.get_one::<String>("kind") {
        Some(k) => vec![k.parse()?],
        None => vec![RecordKind::Purchase, RecordKind::Sale],
    };
    let status_filter: Option<PaymentStatus> = sub
        .get_one::<String>("status")
        .map(|s| s.parse())
        .transpose()?;

    let mut rows = Vec::new();
    for kind in kinds {
        for (index, record) in store::list_records(conn, kind)?.into_iter().enumerate() {
            if let Some(want) = status_filter {
                if record.payment_status != want {
                    continue;
                }
            }
            rows.push(to_row(kind, index, &record));
        }
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}

fn to_row(kind: RecordKind, index: usize, record: &TransactionRecord) -> RecordRow {
    let dec = |v: Option<rust_decimal::Decimal>| {
        v.map(|d| d.round_dp(2).to_string()).unwrap_or_default()
    };
    RecordRow {
        kind: kind.to_string(),
        index,
        date: record.date.map(|d| d.to_string()).unwrap_or_default(),
        party: record.party.clone().unwrap_or_default(),
        description: record.description.clone().unwrap_or_default(),
        carat: dec(record.carat),
        total_usd: dec(record.total_amount_usd),
        total_inr: dec(record.total_amount_inr),
        rate: record
            .exchange_rate
            .map(|d| d.to_string())
            .unwrap_or_default(),
        status: record.payment_status.to_string(),
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.kind.clone(),
                    r.index.to_string(),
                    r.date.clone(),
                    r.party.clone(),
                    r.carat.clone(),
                    r.total_usd.clone(),
                    r.total_inr.clone(),
                    r.rate.clone(),
                    r.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "Kind", "Idx", "Date", "Party", "Carat", "Total USD", "Total INR", "Rate",
                    "Status"
                ],
                rows,
            )
        );
    }
    Ok(())
}

/// Everything a client needs to render a record and echo back an untampered
/// status change: the row, projected balances, and the integrity tag over the
/// displayed INR total.
#[derive(Serialize)]
pub struct RecordDetails {
    pub kind: String,
    pub index: usize,
    #[serde(flatten)]
    pub record: TransactionRecord,
    pub balances: Balances,
    pub security_hash: String,
    /// The exchange rate is locked at creation; clients cannot override it.
    pub rate_locked: bool,
}

pub fn record_details(
    conn: &Connection,
    kind: RecordKind,
    index: usize,
) -> Result<RecordDetails> {
    let config = Config::load(conn)?;
    let record = store::load_record(conn, kind, index)?;
    let balances = ledger::project_balances(&record, &config)?;
    let total_inr = ledger::display_total_inr(&record, &config);
    let security_hash = integrity::compute_integrity_tag(total_inr, &config.integrity_secret);
    Ok(RecordDetails {
        kind: kind.to_string(),
        index,
        record,
        balances,
        security_hash,
        rate_locked: true,
    })
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind: RecordKind = sub.get_one::<String>("kind").unwrap().parse()?;
    let index = *sub.get_one::<usize>("index").unwrap();
    let details = record_details(conn, kind, index)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &details)? {
        return Ok(());
    }

    let r = &details.record;
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    let dec = |v: Option<rust_decimal::Decimal>| {
        v.map(|d| d.round_dp(2).to_string()).unwrap_or_default()
    };
    let mut rows = vec![
        vec!["Kind".into(), details.kind.clone()],
        vec!["Index".into(), details.index.to_string()],
        vec![
            "Date".into(),
            r.date.map(|d| d.to_string()).unwrap_or_default(),
        ],
        vec!["Party".into(), opt(&r.party)],
        vec!["Description".into(), opt(&r.description)],
        vec!["Stone ID".into(), opt(&r.stone_id)],
        vec!["Kapan No".into(), opt(&r.kapan_no)],
        vec!["Carat".into(), dec(r.carat)],
        vec![
            "Quantity".into(),
            r.quantity.map(|q| q.to_string()).unwrap_or_default(),
        ],
        vec!["Total USD".into(), dec(r.total_amount_usd)],
        vec!["Total INR".into(), dec(r.total_amount_inr)],
        vec![
            "Rate (locked)".into(),
            r.exchange_rate.map(|d| d.to_string()).unwrap_or_default(),
        ],
        vec!["Status".into(), r.payment_status.to_string()],
        vec![
            "Payment done".into(),
            r.payment_done_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
        ],
        vec![
            "Received USD".into(),
            details.balances.received_usd.round_dp(2).to_string(),
        ],
        vec![
            "Received INR".into(),
            details.balances.received_inr.round_dp(2).to_string(),
        ],
        vec![
            "Remaining USD".into(),
            details.balances.remaining_usd.round_dp(2).to_string(),
        ],
        vec![
            "Remaining INR".into(),
            details.balances.remaining_inr.round_dp(2).to_string(),
        ],
        vec!["Integrity tag".into(), details.security_hash.clone()],
    ];
    if !r.partial_payments.is_empty() {
        rows.push(vec![
            "Partial payments".into(),
            r.partial_payments.len().to_string(),
        ]);
    }
    println!("{}", pretty_table(&["Field", "Value"], rows));

    if !r.partial_payments.is_empty() {
        let history: Vec<Vec<String>> = r
            .partial_payments
            .iter()
            .map(|p| {
                vec![
                    p.date.to_string(),
                    p.amount.to_string(),
                    p.currency.to_string(),
                    p.exchange_rate.to_string(),
                    p.reference.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Amount", "CCY", "Rate", "Reference"], history)
        );
    }
    Ok(())
}

fn delete(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind: RecordKind = sub.get_one::<String>("kind").unwrap().parse()?;
    let index = *sub.get_one::<usize>("index").unwrap();
    store::delete_record(conn, kind, index)?;
    println!("Deleted {} record {} (later indices shift down)", kind, index);
    Ok(())
}
