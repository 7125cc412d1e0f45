// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::ledger::{self, StatusChangeRequest};
use crate::models::{Currency, PaymentStatus, RecordKind};
use crate::store;
use crate::utils::{parse_date, parse_decimal};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("status", sub)) => set_status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// The one write path for payment state: load the record, run it through the
/// ledger engine, persist the result only on success.
fn set_status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind: RecordKind = sub.get_one::<String>("kind").unwrap().parse()?;
    let index = *sub.get_one::<usize>("index").unwrap();
    let requested: PaymentStatus = sub.get_one::<String>("status").unwrap().parse()?;

    let request = StatusChangeRequest {
        new_status: Some(requested),
        payment_done_date: sub
            .get_one::<String>("date")
            .map(|s| parse_date(s))
            .transpose()?,
        partial_amount: sub.get_one::<String>("amount").cloned(),
        partial_payment_date: sub
            .get_one::<String>("payment-date")
            .map(|s| parse_date(s))
            .transpose()?,
        partial_payment_reference: sub.get_one::<String>("reference").cloned(),
        payment_currency: sub
            .get_one::<String>("currency")
            .map(|s| s.parse::<Currency>())
            .transpose()?,
        claimed_total_amount_inr: sub
            .get_one::<String>("claimed-total")
            .map(|s| parse_decimal(s))
            .transpose()?,
        claimed_exchange_rate: sub
            .get_one::<String>("claimed-rate")
            .map(|s| parse_decimal(s))
            .transpose()?,
        security_hash: sub.get_one::<String>("hash").cloned(),
    };

    let config = Config::load(conn)?;
    let record = store::load_record(conn, kind, index)?;
    let updated = ledger::apply_status_change(&record, &request, &config)?;
    store::save_record(conn, kind, index, &updated)?;

    println!(
        "{} record {} payment status updated to {}",
        kind, index, updated.payment_status
    );
    if requested == PaymentStatus::Partial && updated.payment_status == PaymentStatus::Completed {
        println!("Received amount is within one rupee of the total; marked Completed.");
    }
    Ok(())
}
