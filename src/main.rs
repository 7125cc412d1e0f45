// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use caratclip::models::RecordKind;
use caratclip::{cli, commands, db};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("buy", sub)) => commands::trade::handle(&conn, RecordKind::Purchase, sub)?,
        Some(("sell", sub)) => commands::trade::handle(&conn, RecordKind::Sale, sub)?,
        Some(("records", sub)) => commands::records::handle(&conn, sub)?,
        Some(("pay", sub)) => commands::payments::handle(&conn, sub)?,
        Some(("inventory", sub)) => commands::inventory::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("config", sub)) => commands::settings::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
