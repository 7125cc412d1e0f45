// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{PaymentStatus, RecordKind, TransactionRecord};
use crate::store;
use crate::utils::{parse_date, parse_decimal};
use anyhow::{Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;

/// Records a purchase or sale. Totals are carat x price-per-carat in each
/// currency; the exchange rate captured here becomes the record's anchor for
/// every later partial payment.
pub fn handle(conn: &Connection, kind: RecordKind, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let party = sub.get_one::<String>("party").unwrap().trim().to_string();

    let carat = parse_decimal(sub.get_one::<String>("carat").unwrap())?;
    if carat <= Decimal::ZERO {
        bail!("Carat must be greater than 0");
    }
    let quantity = *sub.get_one::<i64>("quantity").unwrap();
    if quantity <= 0 {
        bail!("Quantity must be greater than 0");
    }
    let price_usd = parse_decimal(sub.get_one::<String>("price-per-carat").unwrap())?;
    if price_usd <= Decimal::ZERO {
        bail!("Price per carat must be greater than 0");
    }
    let price_inr = parse_decimal(sub.get_one::<String>("price-per-carat-inr").unwrap())?;
    if price_inr <= Decimal::ZERO {
        bail!("Price per carat (INR) must be greater than 0");
    }

    let total_usd = carat * price_usd;
    let total_inr = carat * price_inr;

    let rate = match sub.get_one::<String>("rate") {
        Some(s) => {
            let r = parse_decimal(s)?;
            if r <= Decimal::ZERO {
                bail!("Exchange rate must be greater than 0");
            }
            r
        }
        None => (price_inr / price_usd).round_dp(4),
    };

    let status: PaymentStatus = sub.get_one::<String>("status").unwrap().parse()?;
    if status == PaymentStatus::Partial {
        bail!("Partial payments are recorded with 'pay status' after creation");
    }
    let payment_done_date = if status == PaymentStatus::Completed {
        sub.get_one::<String>("payment-date")
            .map(|s| parse_date(s))
            .transpose()?
    } else {
        None
    };

    let record = TransactionRecord {
        date: Some(date),
        party: Some(party.clone()),
        description: sub.get_one::<String>("description").cloned(),
        stone_id: sub.get_one::<String>("stone-id").cloned(),
        kapan_no: sub.get_one::<String>("kapan-no").cloned(),
        carat: Some(carat),
        quantity: Some(quantity),
        price_per_carat_usd: Some(price_usd),
        price_per_carat_inr: Some(price_inr),
        total_amount_usd: Some(total_usd),
        total_amount_inr: Some(total_inr),
        exchange_rate: Some(rate),
        payment_status: status,
        payment_done_date,
        payment_reference: sub.get_one::<String>("reference").cloned(),
        payment_due_date: sub
            .get_one::<String>("due-date")
            .map(|s| parse_date(s))
            .transpose()?,
        payment_notes: sub.get_one::<String>("notes").cloned(),
        partial_payments: Vec::new(),
    };

    let index = store::append_record(conn, kind, &record)?;
    println!(
        "Recorded {} #{}: {} ct from '{}' for USD {} / INR {} (rate {})",
        kind,
        index,
        carat,
        party,
        total_usd.round_dp(2),
        total_inr.round_dp(2),
        rate
    );
    Ok(())
}
