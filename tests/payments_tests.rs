// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use caratclip::ledger::LedgerError;
use caratclip::models::{PaymentStatus, RecordKind};
use caratclip::{cli, commands, db, store};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run(conn: &Connection, argv: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("buy", sub)) => commands::trade::handle(conn, RecordKind::Purchase, sub),
        Some(("sell", sub)) => commands::trade::handle(conn, RecordKind::Sale, sub),
        Some(("pay", sub)) => commands::payments::handle(conn, sub),
        Some(("records", sub)) => commands::records::handle(conn, sub),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

fn seed_purchase(conn: &Connection) {
    // totals: USD 1000, INR 83000, anchor rate 83
    run(
        conn,
        &[
            "caratclip",
            "buy",
            "--date",
            "2024-01-10",
            "--party",
            "Mehta & Sons",
            "--carat",
            "10",
            "--price-per-carat",
            "100",
            "--price-per-carat-inr",
            "8300",
        ],
    )
    .unwrap();
}

#[test]
fn partial_payment_flows_through_engine_and_store() {
    let conn = setup();
    seed_purchase(&conn);

    run(
        &conn,
        &[
            "caratclip", "pay", "status", "--kind", "purchase", "--index", "0", "--status",
            "partial", "--amount", "40000", "--payment-date", "2024-02-01", "--reference",
            "NEFT-1881",
        ],
    )
    .unwrap();

    let rec = store::load_record(&conn, RecordKind::Purchase, 0).unwrap();
    assert_eq!(rec.payment_status, PaymentStatus::Partial);
    assert_eq!(rec.partial_payments.len(), 1);
    assert_eq!(rec.partial_payments[0].exchange_rate, d("83"));
    assert_eq!(rec.partial_payments[0].reference, "NEFT-1881");

    let details = commands::records::record_details(&conn, RecordKind::Purchase, 0).unwrap();
    assert_eq!(details.balances.received_inr, d("40000"));
    assert_eq!(details.balances.remaining_inr, d("43000"));
}

#[test]
fn usd_partial_converts_at_anchor_and_promotes() {
    let conn = setup();
    seed_purchase(&conn);

    // 999.99 USD = 82999.17 INR, 0.83 INR short of the total: within tolerance
    run(
        &conn,
        &[
            "caratclip", "pay", "status", "--kind", "purchase", "--index", "0", "--status",
            "partial", "--amount", "999.99", "--payment-date", "2024-02-01", "--currency", "USD",
        ],
    )
    .unwrap();

    let rec = store::load_record(&conn, RecordKind::Purchase, 0).unwrap();
    assert_eq!(rec.payment_status, PaymentStatus::Completed);
    // auto-promotion keeps the history around
    assert_eq!(rec.partial_payments.len(), 1);
    assert_eq!(
        rec.payment_done_date.map(|d| d.to_string()),
        Some("2024-02-01".to_string())
    );
}

#[test]
fn tampered_claimed_total_aborts_without_writing() {
    let conn = setup();
    seed_purchase(&conn);

    let err = run(
        &conn,
        &[
            "caratclip", "pay", "status", "--kind", "purchase", "--index", "0", "--status",
            "partial", "--amount", "1000", "--payment-date", "2024-02-01", "--claimed-total",
            "82000",
        ],
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::Integrity(_))
    ));

    let rec = store::load_record(&conn, RecordKind::Purchase, 0).unwrap();
    assert_eq!(rec.payment_status, PaymentStatus::Pending);
    assert!(rec.partial_payments.is_empty());
}

#[test]
fn echoed_tag_verifies_and_forged_tag_does_not() {
    let conn = setup();
    seed_purchase(&conn);

    let tag = commands::records::record_details(&conn, RecordKind::Purchase, 0)
        .unwrap()
        .security_hash;

    run(
        &conn,
        &[
            "caratclip", "pay", "status", "--kind", "purchase", "--index", "0", "--status",
            "partial", "--amount", "500", "--payment-date", "2024-02-01", "--hash", &tag,
        ],
    )
    .unwrap();

    let err = run(
        &conn,
        &[
            "caratclip", "pay", "status", "--kind", "purchase", "--index", "0", "--status",
            "partial", "--amount", "500", "--payment-date", "2024-02-02", "--hash", "ffffffffff",
        ],
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::Integrity(_))
    ));
}

#[test]
fn pending_reset_clears_payment_state() {
    let conn = setup();
    seed_purchase(&conn);

    run(
        &conn,
        &[
            "caratclip", "pay", "status", "--kind", "purchase", "--index", "0", "--status",
            "partial", "--amount", "40000", "--payment-date", "2024-02-01",
        ],
    )
    .unwrap();
    run(
        &conn,
        &[
            "caratclip", "pay", "status", "--kind", "purchase", "--index", "0", "--status",
            "pending",
        ],
    )
    .unwrap();

    let rec = store::load_record(&conn, RecordKind::Purchase, 0).unwrap();
    assert_eq!(rec.payment_status, PaymentStatus::Pending);
    assert_eq!(rec.payment_done_date, None);
    assert!(rec.partial_payments.is_empty());
}

#[test]
fn missing_record_index_is_not_found() {
    let conn = setup();
    let err = run(
        &conn,
        &[
            "caratclip", "pay", "status", "--kind", "purchase", "--index", "7", "--status",
            "completed",
        ],
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::NotFound(_))
    ));
}
