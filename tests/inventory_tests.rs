// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use caratclip::{cli, commands::inventory, db};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run(conn: &Connection, argv: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("inventory", inv_m)) = matches.subcommand() {
        inventory::handle(conn, inv_m)
    } else {
        panic!("no inventory subcommand");
    }
}

#[test]
fn add_and_set_status() {
    let conn = setup();
    run(
        &conn,
        &[
            "caratclip", "inventory", "add", "--item-id", "RND-001", "--shape", "Round",
            "--carat", "1.21", "--location", "Surat",
        ],
    )
    .unwrap();

    run(
        &conn,
        &[
            "caratclip", "inventory", "set-status", "--item-id", "RND-001", "--status", "sold",
        ],
    )
    .unwrap();

    let status: String = conn
        .query_row(
            "SELECT status FROM inventory WHERE item_id='RND-001'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(status, "Sold");
}

#[test]
fn duplicate_item_id_is_rejected() {
    let conn = setup();
    let add = [
        "caratclip", "inventory", "add", "--item-id", "RND-001",
    ];
    run(&conn, &add).unwrap();
    assert!(run(&conn, &add).is_err());
}

#[test]
fn set_status_on_missing_item_fails() {
    let conn = setup();
    let res = run(
        &conn,
        &[
            "caratclip", "inventory", "set-status", "--item-id", "NOPE", "--status", "reserved",
        ],
    );
    assert!(res.is_err());
}
