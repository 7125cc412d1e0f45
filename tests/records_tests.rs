// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use caratclip::integrity::TAG_LEN;
use caratclip::models::RecordKind;
use caratclip::{cli, commands, db};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn buy(conn: &Connection, date: &str, party: &str, status: &str) {
    let matches = cli::build_cli().get_matches_from([
        "caratclip",
        "buy",
        "--date",
        date,
        "--party",
        party,
        "--carat",
        "5",
        "--price-per-carat",
        "200",
        "--price-per-carat-inr",
        "16600",
        "--status",
        status,
    ]);
    if let Some(("buy", sub)) = matches.subcommand() {
        commands::trade::handle(conn, RecordKind::Purchase, sub).unwrap();
    } else {
        panic!("no buy subcommand");
    }
}

fn list_rows(conn: &Connection, argv: &[&str]) -> Vec<commands::records::RecordRow> {
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("records", rec_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = rec_m.subcommand() {
            return commands::records::query_rows(conn, list_m).unwrap();
        }
    }
    panic!("no records list subcommand");
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    for i in 1..=3 {
        buy(&conn, &format!("2025-01-0{}", i), "P", "pending");
    }
    let rows = list_rows(
        &conn,
        &["caratclip", "records", "list", "--limit", "2"],
    );
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-01-01");
    assert_eq!(
        rows[0].rate.parse::<rust_decimal::Decimal>().unwrap(),
        rust_decimal::Decimal::from(83u32)
    );
}

#[test]
fn list_filters_by_status() {
    let conn = setup();
    buy(&conn, "2025-01-01", "A", "pending");
    buy(&conn, "2025-01-02", "B", "completed");

    let rows = list_rows(
        &conn,
        &[
            "caratclip", "records", "list", "--kind", "purchase", "--status", "completed",
        ],
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].party, "B");
    assert_eq!(rows[0].status, "Completed");
}

#[test]
fn show_details_carry_balances_and_tag() {
    let conn = setup();
    buy(&conn, "2025-01-01", "A", "pending");

    let details = commands::records::record_details(&conn, RecordKind::Purchase, 0).unwrap();
    assert_eq!(details.security_hash.len(), TAG_LEN);
    assert!(details.rate_locked);
    assert_eq!(details.balances.received_inr.to_string(), "0");
    assert_eq!(
        details.balances.remaining_inr,
        "83000".parse::<rust_decimal::Decimal>().unwrap()
    );

    // the tag is stable for the same record and secret
    let again = commands::records::record_details(&conn, RecordKind::Purchase, 0).unwrap();
    assert_eq!(details.security_hash, again.security_hash);
}
