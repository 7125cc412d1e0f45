// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{PaymentStatus, RecordKind};
use crate::store;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

/// Rounding slack allowed between the stored INR total and USD total x rate.
const TOTALS_DRIFT_TOLERANCE: Decimal = Decimal::ONE;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    for kind in [RecordKind::Purchase, RecordKind::Sale] {
        for (index, record) in store::list_records(conn, kind)?.into_iter().enumerate() {
            let at = format!("{} {}", kind, index);

            // totals must agree with the anchor rate, within rounding
            if let (Some(usd), Some(inr), Some(rate)) = (
                record.total_amount_usd,
                record.total_amount_inr,
                record.exchange_rate,
            ) {
                if (inr - usd * rate).abs() > TOTALS_DRIFT_TOLERANCE {
                    rows.push(vec![
                        "totals_rate_drift".into(),
                        format!("{}: INR {} vs USD {} x {}", at, inr, usd, rate),
                    ]);
                }
            }

            // status should be consistent with the payment history; a
            // Completed record MAY keep history (tolerance auto-promotion)
            match record.payment_status {
                PaymentStatus::Partial if record.partial_payments.is_empty() => {
                    rows.push(vec!["partial_without_history".into(), at.clone()]);
                }
                PaymentStatus::Pending if !record.partial_payments.is_empty() => {
                    rows.push(vec!["pending_with_history".into(), at.clone()]);
                }
                _ => {}
            }

            if record.exchange_rate.is_none() && !record.partial_payments.is_empty() {
                rows.push(vec!["missing_anchor_rate".into(), at]);
            }
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
