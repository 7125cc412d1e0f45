// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn kind_arg(required: bool) -> Arg {
    Arg::new("kind")
        .long("kind")
        .required(required)
        .help("Record kind: purchase|sale")
}

fn index_arg() -> Arg {
    Arg::new("index")
        .long("index")
        .required(true)
        .value_parser(value_parser!(usize))
        .help("Row index within the kind (0-based)")
}

fn trade_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(Arg::new("date").long("date").required(true))
        .arg(Arg::new("party").long("party").required(true))
        .arg(Arg::new("description").long("description"))
        .arg(Arg::new("stone-id").long("stone-id"))
        .arg(Arg::new("kapan-no").long("kapan-no"))
        .arg(
            Arg::new("carat")
                .long("carat")
                .required(true)
                .help("Total carat weight"),
        )
        .arg(
            Arg::new("quantity")
                .long("quantity")
                .value_parser(value_parser!(i64))
                .default_value("1"),
        )
        .arg(
            Arg::new("price-per-carat")
                .long("price-per-carat")
                .required(true)
                .help("Price per carat in USD"),
        )
        .arg(
            Arg::new("price-per-carat-inr")
                .long("price-per-carat-inr")
                .required(true)
                .help("Price per carat in INR"),
        )
        .arg(
            Arg::new("rate")
                .long("rate")
                .help("USD->INR rate locked for this record (derived from the two prices when omitted)"),
        )
        .arg(
            Arg::new("status")
                .long("status")
                .default_value("pending")
                .help("Initial payment status: pending|completed"),
        )
        .arg(
            Arg::new("payment-date")
                .long("payment-date")
                .help("Payment done date, for completed records"),
        )
        .arg(Arg::new("reference").long("reference"))
        .arg(Arg::new("due-date").long("due-date"))
        .arg(Arg::new("notes").long("notes"))
}

fn records_cmd() -> Command {
    Command::new("records")
        .about("List, inspect, and delete purchase/sale records")
        .subcommand(json_flags(
            Command::new("list")
                .about("List records")
                .arg(kind_arg(false))
                .arg(Arg::new("status").long("status").help("Filter by payment status"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(json_flags(
            Command::new("show")
                .about("Show one record with balances and its integrity tag")
                .arg(kind_arg(true))
                .arg(index_arg()),
        ))
        .subcommand(
            Command::new("delete")
                .about("Delete a record (later indices shift down)")
                .arg(kind_arg(true))
                .arg(index_arg()),
        )
}

fn pay_cmd() -> Command {
    Command::new("pay").about("Payment status changes").subcommand(
        Command::new("status")
            .about("Apply a status change, optionally recording a partial payment")
            .arg(kind_arg(true))
            .arg(index_arg())
            .arg(
                Arg::new("status")
                    .long("status")
                    .required(true)
                    .help("New status: pending|partial|completed"),
            )
            .arg(
                Arg::new("date")
                    .long("date")
                    .help("Payment done date (completed transitions)"),
            )
            .arg(
                Arg::new("amount")
                    .long("amount")
                    .help("Partial payment amount"),
            )
            .arg(
                Arg::new("payment-date")
                    .long("payment-date")
                    .help("Partial payment date"),
            )
            .arg(Arg::new("reference").long("reference"))
            .arg(
                Arg::new("currency")
                    .long("currency")
                    .help("Payment currency: USD|INR (default INR)"),
            )
            .arg(
                Arg::new("claimed-total")
                    .long("claimed-total")
                    .help("Client-side INR total, checked against the stored record"),
            )
            .arg(
                Arg::new("claimed-rate")
                    .long("claimed-rate")
                    .help("Client-side exchange rate; the stored anchor wins on mismatch"),
            )
            .arg(
                Arg::new("hash")
                    .long("hash")
                    .help("Integrity tag echoed from 'records show'"),
            ),
    )
}

fn inventory_cmd() -> Command {
    Command::new("inventory")
        .about("Stone inventory")
        .subcommand(
            Command::new("add")
                .about("Add an inventory item")
                .arg(Arg::new("item-id").long("item-id").required(true))
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("shape").long("shape"))
                .arg(Arg::new("carat").long("carat"))
                .arg(
                    Arg::new("status")
                        .long("status")
                        .default_value("In Stock"),
                )
                .arg(Arg::new("location").long("location"))
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List inventory")
                .arg(Arg::new("status").long("status").help("Filter by status")),
        ))
        .subcommand(
            Command::new("set-status")
                .about("Update an item's status")
                .arg(Arg::new("item-id").long("item-id").required(true))
                .arg(Arg::new("status").long("status").required(true)),
        )
}

fn export_cmd() -> Command {
    Command::new("export")
        .about("Export data to csv or json")
        .subcommand(
            Command::new("records")
                .arg(kind_arg(true))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("inventory")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
}

fn config_cmd() -> Command {
    Command::new("config")
        .about("Application settings")
        .subcommand(Command::new("show").about("Show current settings"))
        .subcommand(
            Command::new("set-rate")
                .about("Set the default exchange rate for rows without an anchor")
                .arg(Arg::new("rate").required(true)),
        )
        .subcommand(
            Command::new("set-secret")
                .about("Replace the integrity-tag secret (old tags stop verifying)")
                .arg(Arg::new("secret").required(true)),
        )
}

pub fn build_cli() -> Command {
    Command::new("caratclip")
        .about("Diamond trading ledger: purchases, sales, multi-currency partial payments, inventory")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(trade_cmd("buy", "Record a purchase"))
        .subcommand(trade_cmd("sell", "Record a sale"))
        .subcommand(records_cmd())
        .subcommand(pay_cmd())
        .subcommand(inventory_cmd())
        .subcommand(export_cmd())
        .subcommand(config_cmd())
        .subcommand(Command::new("doctor").about("Check ledger invariants across the store"))
}
