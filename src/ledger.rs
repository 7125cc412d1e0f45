// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Payment ledger engine.
//!
//! The single authoritative implementation of partial-payment reconciliation:
//! it takes a transaction record plus a status-change request and returns the
//! new record state. Pure computation, no I/O; persistence belongs to the
//! caller, which must treat load -> apply -> save as one critical section per
//! record.

use crate::config::Config;
use crate::integrity;
use crate::models::{Balances, Currency, PaymentEvent, PaymentStatus, TransactionRecord};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// A received INR total within one rupee of the record total counts as paid
/// in full and promotes the record to Completed.
pub const COMPLETION_TOLERANCE_INR: Decimal = Decimal::ONE;

/// Client-claimed totals and rates must match the stored values within 0.01;
/// a total further off is treated as tampering, a rate further off is
/// silently replaced with the stored anchor rate.
pub const CLAIM_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors produced by the ledger engine. All are per-request recoverable;
/// the input record is never modified on failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Malformed or missing input; caller should re-prompt.
    #[error("validation error: {0}")]
    Validation(String),

    /// Claimed total or security hash does not match the stored record.
    #[error("security warning: {0}")]
    Integrity(String),

    /// Record index does not resolve in the store.
    #[error("record not found: {0}")]
    NotFound(String),
}

/// A status-change request, as submitted by a caller. `partial_amount` stays
/// a raw string so parse failures surface as `Validation` errors here rather
/// than upstream.
#[derive(Debug, Clone, Default)]
pub struct StatusChangeRequest {
    pub new_status: Option<PaymentStatus>,
    pub payment_done_date: Option<NaiveDate>,
    pub partial_amount: Option<String>,
    pub partial_payment_date: Option<NaiveDate>,
    pub partial_payment_reference: Option<String>,
    pub payment_currency: Option<Currency>,
    pub claimed_total_amount_inr: Option<Decimal>,
    pub claimed_exchange_rate: Option<Decimal>,
    pub security_hash: Option<String>,
}

/// Applies a status-change request to a record and returns the updated copy.
///
/// Verification order: claimed total, then security hash, then exchange-rate
/// resolution. A claimed rate that drifts from the stored anchor is not an
/// error; the anchor simply wins.
pub fn apply_status_change(
    record: &TransactionRecord,
    request: &StatusChangeRequest,
    config: &Config,
) -> Result<TransactionRecord> {
    let anchor_rate = anchor_rate(record, config);
    let total_inr = effective_total_inr(record, anchor_rate);

    if let Some(claimed) = request.claimed_total_amount_inr {
        if (claimed - total_inr).abs() > CLAIM_TOLERANCE {
            return Err(LedgerError::Integrity("total amount mismatch".into()));
        }
    }

    if let Some(hash) = request.security_hash.as_deref() {
        if !integrity::verify_integrity_tag(total_inr, &config.integrity_secret, hash) {
            return Err(LedgerError::Integrity("integrity check failed".into()));
        }
    }

    // Never trust a client-supplied rate: only accept it when it already
    // agrees with the stored anchor.
    let rate = match request.claimed_exchange_rate {
        Some(claimed) if (claimed - anchor_rate).abs() <= CLAIM_TOLERANCE => claimed,
        _ => anchor_rate,
    };

    let mut updated = record.clone();

    match request.new_status {
        Some(PaymentStatus::Completed) => {
            updated.payment_status = PaymentStatus::Completed;
            if let Some(date) = request.payment_done_date {
                updated.payment_done_date = Some(date);
            }
            // Direct completion is a hard reset of the history.
            updated.partial_payments.clear();
        }
        Some(PaymentStatus::Partial) => {
            let (amount_raw, date) = match (
                request.partial_amount.as_deref(),
                request.partial_payment_date,
            ) {
                (Some(a), Some(d)) => (a, d),
                _ => {
                    return Err(LedgerError::Validation(
                        "payment amount and date are required for partial payments".into(),
                    ));
                }
            };
            let amount = amount_raw
                .trim()
                .parse::<Decimal>()
                .ok()
                .filter(|a| *a > Decimal::ZERO)
                .ok_or_else(|| LedgerError::Validation("invalid payment amount".into()))?;

            updated.partial_payments.push(PaymentEvent {
                date,
                amount,
                currency: request.payment_currency.unwrap_or(Currency::Inr),
                exchange_rate: rate,
                reference: request
                    .partial_payment_reference
                    .clone()
                    .unwrap_or_default(),
            });
            updated.payment_status = PaymentStatus::Partial;

            let (_, received_inr) = accumulate(&updated.partial_payments, rate)?;

            // Within one rupee of the total counts as fully paid. Note the
            // history is deliberately NOT cleared on this path, unlike a
            // direct Completed transition.
            if (received_inr - total_inr).abs() <= COMPLETION_TOLERANCE_INR {
                updated.payment_status = PaymentStatus::Completed;
                updated.payment_done_date = Some(date);
            }
        }
        _ => {
            updated.payment_status = PaymentStatus::Pending;
            updated.payment_done_date = None;
            updated.partial_payments.clear();
        }
    }

    Ok(updated)
}

/// Projects received/remaining balances from a record's payment history.
///
/// Every event is re-anchored to the record's own exchange rate; stored event
/// rates should already equal the anchor, but the projection re-derives from
/// the authoritative source to tolerate drift in old rows.
pub fn project_balances(record: &TransactionRecord, config: &Config) -> Result<Balances> {
    let rate = anchor_rate(record, config);
    let total_inr = effective_total_inr(record, rate);
    let total_usd = record.total_amount_usd.unwrap_or(Decimal::ZERO);

    let (received_usd, received_inr) = accumulate(&record.partial_payments, rate)?;

    Ok(Balances {
        received_usd,
        received_inr,
        remaining_usd: (total_usd - received_usd).max(Decimal::ZERO),
        remaining_inr: (total_inr - received_inr).max(Decimal::ZERO),
    })
}

/// The INR total callers should display and tag: the stored total, or the
/// USD total converted at the anchor rate for rows that predate the INR
/// column. The engine verifies claimed totals against this same value.
pub fn display_total_inr(record: &TransactionRecord, config: &Config) -> Decimal {
    effective_total_inr(record, anchor_rate(record, config))
}

/// Sums a payment history in both currencies at a single anchor rate.
fn accumulate(events: &[PaymentEvent], rate: Decimal) -> Result<(Decimal, Decimal)> {
    let mut received_usd = Decimal::ZERO;
    let mut received_inr = Decimal::ZERO;
    for event in events {
        match event.currency {
            Currency::Inr => {
                if rate.is_zero() {
                    return Err(LedgerError::Validation(
                        "exchange rate must be non-zero".into(),
                    ));
                }
                received_inr += event.amount;
                received_usd += event.amount / rate;
            }
            Currency::Usd => {
                received_usd += event.amount;
                received_inr += event.amount * rate;
            }
        }
    }
    Ok((received_usd, received_inr))
}

fn anchor_rate(record: &TransactionRecord, config: &Config) -> Decimal {
    record
        .exchange_rate
        .unwrap_or(config.default_exchange_rate)
}

/// The INR total, derived from the USD total when the row predates the INR
/// column.
fn effective_total_inr(record: &TransactionRecord, rate: Decimal) -> Decimal {
    match record.total_amount_inr {
        Some(total) => total,
        None => record
            .total_amount_usd
            .map(|usd| usd * rate)
            .unwrap_or(Decimal::ZERO),
    }
}
