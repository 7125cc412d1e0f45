// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use caratclip::db;
use caratclip::ledger::LedgerError;
use caratclip::models::{Currency, PaymentEvent, PaymentStatus, RecordKind, TransactionRecord};
use caratclip::store;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn sample(party: &str) -> TransactionRecord {
    TransactionRecord {
        date: Some(day("2024-01-15")),
        party: Some(party.to_string()),
        description: Some("rough parcel".to_string()),
        carat: Some(d("12.5")),
        quantity: Some(3),
        price_per_carat_usd: Some(d("80")),
        price_per_carat_inr: Some(d("6640")),
        total_amount_usd: Some(d("1000")),
        total_amount_inr: Some(d("83000")),
        exchange_rate: Some(d("83")),
        ..TransactionRecord::new()
    }
}

#[test]
fn append_load_round_trip_with_history() {
    let conn = setup();
    let mut rec = sample("Mehta & Sons");
    rec.payment_status = PaymentStatus::Partial;
    rec.partial_payments.push(PaymentEvent {
        date: day("2024-02-01"),
        amount: d("40000"),
        currency: Currency::Inr,
        exchange_rate: d("83"),
        reference: "NEFT-1881".to_string(),
    });
    rec.partial_payments.push(PaymentEvent {
        date: day("2024-02-20"),
        amount: d("250.75"),
        currency: Currency::Usd,
        exchange_rate: d("83"),
        reference: String::new(),
    });

    let index = store::append_record(&conn, RecordKind::Purchase, &rec).unwrap();
    assert_eq!(index, 0);

    let loaded = store::load_record(&conn, RecordKind::Purchase, 0).unwrap();
    assert_eq!(loaded, rec);
}

#[test]
fn save_overwrites_in_place() {
    let conn = setup();
    store::append_record(&conn, RecordKind::Sale, &sample("A")).unwrap();

    let mut rec = store::load_record(&conn, RecordKind::Sale, 0).unwrap();
    rec.payment_status = PaymentStatus::Completed;
    rec.payment_done_date = Some(day("2024-03-01"));
    store::save_record(&conn, RecordKind::Sale, 0, &rec).unwrap();

    let loaded = store::load_record(&conn, RecordKind::Sale, 0).unwrap();
    assert_eq!(loaded.payment_status, PaymentStatus::Completed);
    assert_eq!(loaded.payment_done_date, Some(day("2024-03-01")));
    assert_eq!(store::count_records(&conn, RecordKind::Sale).unwrap(), 1);
}

#[test]
fn kinds_are_separate_ledgers() {
    let conn = setup();
    store::append_record(&conn, RecordKind::Purchase, &sample("P")).unwrap();
    assert_eq!(store::count_records(&conn, RecordKind::Purchase).unwrap(), 1);
    assert_eq!(store::count_records(&conn, RecordKind::Sale).unwrap(), 0);
    assert!(store::load_record(&conn, RecordKind::Sale, 0).is_err());
}

#[test]
fn missing_index_fails_closed_with_not_found() {
    let conn = setup();
    store::append_record(&conn, RecordKind::Purchase, &sample("P")).unwrap();

    let err = store::load_record(&conn, RecordKind::Purchase, 5).unwrap_err();
    let ledger_err = err.downcast_ref::<LedgerError>().expect("typed error");
    assert!(matches!(ledger_err, LedgerError::NotFound(_)));

    let err = store::save_record(&conn, RecordKind::Purchase, 5, &sample("P")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::NotFound(_))
    ));
}

#[test]
fn delete_shifts_later_indices() {
    let conn = setup();
    for name in ["first", "second", "third"] {
        store::append_record(&conn, RecordKind::Purchase, &sample(name)).unwrap();
    }
    store::delete_record(&conn, RecordKind::Purchase, 1).unwrap();

    assert_eq!(store::count_records(&conn, RecordKind::Purchase).unwrap(), 2);
    let at1 = store::load_record(&conn, RecordKind::Purchase, 1).unwrap();
    assert_eq!(at1.party.as_deref(), Some("third"));
}

#[test]
fn malformed_history_degrades_to_empty() {
    let conn = setup();
    store::append_record(&conn, RecordKind::Purchase, &sample("P")).unwrap();
    conn.execute(
        "UPDATE purchases SET partial_payments='not json'",
        [],
    )
    .unwrap();

    let loaded = store::load_record(&conn, RecordKind::Purchase, 0).unwrap();
    assert!(loaded.partial_payments.is_empty());
}
