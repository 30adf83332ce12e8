// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    ]
}

fn period_arg() -> Arg {
    Arg::new("period")
        .long("period")
        .value_name("YYYY-MM")
        .help("Accounting period (defaults to the current month)")
}

fn range_args() -> [Arg; 2] {
    [
        Arg::new("from")
            .long("from")
            .value_name("YYYY-MM")
            .required(true)
            .help("First period of the range"),
        Arg::new("to")
            .long("to")
            .value_name("YYYY-MM")
            .required(true)
            .help("Last period of the range (may precede --from)"),
    ]
}

fn account_arg() -> Arg {
    Arg::new("account")
        .long("account")
        .value_name("NAME")
        .help("Only bills of this account (exact match)")
}

fn bill_field_args(required: bool) -> Vec<Arg> {
    vec![
        Arg::new("account")
            .long("account")
            .required(required)
            .help("Account name, e.g. Electricity"),
        Arg::new("amount")
            .long("amount")
            .required(required)
            .allow_hyphen_values(true),
        Arg::new("date")
            .long("date")
            .value_name("YYYY-MM-DD")
            .required(required)
            .help("Payment date"),
        Arg::new("payer")
            .long("payer")
            .required(required)
            .help("Payer label (one of the configured payers, or Other)"),
        Arg::new("instance")
            .long("instance")
            .help("Sub-label, e.g. unit or apartment"),
        Arg::new("receipt").long("receipt").value_name("URL"),
        Arg::new("invoice").long("invoice").value_name("URL"),
        Arg::new("period")
            .long("period")
            .value_name("YYYY-MM")
            .help("Period the bill belongs to (defaults to the payment date's month)"),
    ]
}

pub fn build_cli() -> Command {
    command!()
        .name("billbook")
        .about("Household bills, period reports and two-payer split balances")
        .arg(
            Arg::new("strict")
                .long("strict")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Fail on malformed amounts instead of counting them as zero"),
        )
        .subcommand(Command::new("init").about("Initialize the local database"))
        .subcommand(
            Command::new("bill")
                .about("Record, edit and list bills")
                .subcommand(
                    Command::new("add")
                        .args(bill_field_args(true))
                        .arg(
                            Arg::new("split")
                                .long("split")
                                .action(ArgAction::SetTrue)
                                .help("Cost is shared 50/50 between the two payers"),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .args(bill_field_args(false))
                        .arg(
                            Arg::new("split")
                                .long("split")
                                .value_parser(clap::value_parser!(bool))
                                .help("true or false"),
                        ),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("list")
                        .arg(period_arg())
                        .arg(account_arg())
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("accounts")
                .about("Distinct account names")
                .args(json_args()),
        )
        .subcommand(
            Command::new("years")
                .about("Years with data, through the current year")
                .args(json_args()),
        )
        .subcommand(
            Command::new("report")
                .about("Summaries over one month or a range")
                .subcommand(
                    Command::new("month")
                        .about("Payer totals, categories, split balance and pending bills")
                        .arg(period_arg())
                        .arg(adjustment_arg())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("range")
                        .about("Categories, recurring accounts and per-period totals")
                        .args(range_args())
                        .arg(account_arg())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("account")
                        .about("Per-period totals of one account")
                        .args(range_args())
                        .arg(account_arg().required(true))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("balance")
                        .about("Split-cost balance between the two payers")
                        .arg(period_arg().conflicts_with_all(["from", "to"]))
                        .arg(
                            Arg::new("from")
                                .long("from")
                                .value_name("YYYY-MM")
                                .requires("to"),
                        )
                        .arg(
                            Arg::new("to")
                                .long("to")
                                .value_name("YYYY-MM")
                                .requires("from"),
                        )
                        .arg(adjustment_arg())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("compare")
                        .about("Selected accounts against last month and the same month last year")
                        .arg(period_arg())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("pending")
                        .about("Accounts paid last month but not yet this month")
                        .arg(period_arg())
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("export").about("Export bills").subcommand(
                Command::new("bills")
                    .args(range_args())
                    .arg(account_arg())
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .value_parser(["csv", "json"]),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("config")
                .about("Show configuration")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("path")),
        )
}

fn adjustment_arg() -> Arg {
    Arg::new("adjustment")
        .long("adjustment")
        .allow_hyphen_values(true)
        .help("Override the configured adjustment in Payer A's favour")
}
