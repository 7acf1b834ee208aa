// Copyright (c) 2025 Defter Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print output as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print output as JSON lines"),
    )
}

fn window_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("start")
            .long("start")
            .required(true)
            .help("Window start date (YYYY-MM-DD, inclusive)"),
    )
    .arg(
        Arg::new("end")
            .long("end")
            .required(true)
            .help("Window end date (YYYY-MM-DD, inclusive)"),
    )
}

pub fn build_cli() -> Command {
    Command::new("defter")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Track project collections and payments; derive trial balance and ledger reports")
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("project")
                .about("Manage the project roster")
                .subcommand(
                    Command::new("add")
                        .about("Add a project")
                        .arg(Arg::new("code").long("code").required(true))
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("client").long("client").required(true))
                        .arg(
                            Arg::new("start")
                                .long("start")
                                .required(true)
                                .help("Project start date (YYYY-MM-DD)"),
                        )
                        .arg(
                            Arg::new("end")
                                .long("end")
                                .required(true)
                                .help("Project end date (YYYY-MM-DD)"),
                        )
                        .arg(
                            Arg::new("total")
                                .long("total")
                                .default_value("0")
                                .help("Contract total in the project currency"),
                        )
                        .arg(
                            Arg::new("currency")
                                .long("currency")
                                .help("Project currency (defaults to the home currency)"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List projects")))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a project and all of its transactions")
                        .arg(Arg::new("code").long("code").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a collection or payment")
                        .arg(Arg::new("project").long("project").required(true).help("Project code"))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("currency")
                                .long("currency")
                                .help("Transaction currency (defaults to the home currency)"),
                        )
                        .arg(
                            Arg::new("rate")
                                .long("rate")
                                .help("Home units per 1 unit of the transaction currency; \
                                       defaults to the latest stored rate on or before the date"),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser(["collection", "payment"]),
                        ),
                )
                .subcommand(
                    json_flags(
                        Command::new("list")
                            .about("List transactions")
                            .arg(Arg::new("project").long("project").help("Filter by project code"))
                            .arg(Arg::new("month").long("month").help("Filter by month (YYYY-MM)"))
                            .arg(
                                Arg::new("limit")
                                    .long("limit")
                                    .value_parser(value_parser!(usize)),
                            ),
                    ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Derive reports from the current snapshot")
                .subcommand(json_flags(window_args(
                    Command::new("trial-balance")
                        .about("Opening/period/closing debit-credit totals per project"),
                )))
                .subcommand(json_flags(window_args(
                    Command::new("ledger")
                        .about("Chronological running-balance statement for one project")
                        .arg(Arg::new("project").long("project").required(true).help("Project code")),
                ))),
        )
        .subcommand(
            Command::new("fx")
                .about("Manage exchange rates and the home currency")
                .subcommand(
                    Command::new("set-home")
                        .about("Set the home (reporting) currency")
                        .arg(Arg::new("currency").required(true)),
                )
                .subcommand(
                    Command::new("set")
                        .about("Store a rate: home units per 1 unit of a currency")
                        .arg(Arg::new("currency").long("currency").required(true))
                        .arg(Arg::new("rate").long("rate").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("Rate date (YYYY-MM-DD, defaults to today)"),
                        ),
                )
                .subcommand(
                    Command::new("fetch")
                        .about("Fetch recent rates for currencies in use (Frankfurter/ECB)")
                        .arg(
                            Arg::new("days")
                                .long("days")
                                .value_parser(value_parser!(usize))
                                .default_value("30"),
                        ),
                )
                .subcommand(Command::new("list").about("List stored rates")),
        )
        .subcommand(
            Command::new("export")
                .about("Write report output to a file")
                .subcommand(
                    window_args(Command::new("trial-balance").about("Export the trial balance"))
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .value_parser(["csv", "json"]),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    window_args(Command::new("ledger").about("Export one project's ledger"))
                        .arg(Arg::new("project").long("project").required(true).help("Project code"))
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .value_parser(["csv", "json"]),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
}
