// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON instead of a table"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn req(name: &'static str, help: &'static str) -> Arg {
    opt(name, help).required(true)
}

fn timeframe_arg() -> Arg {
    opt("timeframe", "Look-back window: all|30days|90days|6months").default_value("all")
}

fn view_arg() -> Arg {
    opt("view", "Transaction view: all|income|expense").default_value("all")
}

fn width_arg() -> Arg {
    opt("width", "Width of the chart area in characters")
        .value_parser(value_parser!(usize))
        .default_value("60")
}

pub fn build_cli() -> Command {
    Command::new("sitebook")
        .about("Construction project tracking: P&L, tasks and Gantt timelines")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("today")
                .long("today")
                .global(true)
                .help("Pin today's date (YYYY-MM-DD) for due-date and timeframe logic"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("project")
                .about("Manage projects")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Project name"))
                        .arg(req("client", "Client name"))
                        .arg(opt("location", "Site location"))
                        .arg(opt("description", "Free-form description"))
                        .arg(req("budget", "Budget amount"))
                        .arg(req("start", "Start date YYYY-MM-DD"))
                        .arg(opt("due", "Due date YYYY-MM-DD"))
                        .arg(
                            opt("status", "planning|active|on-hold|completed")
                                .default_value("planning"),
                        )
                        .arg(
                            opt("completion", "Percent complete 0-100")
                                .value_parser(value_parser!(i64))
                                .default_value("0"),
                        ),
                )
                .subcommand(
                    Command::new("list")
                        .arg(opt("status", "Only projects with this status"))
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("name").required(true))
                        .arg(opt("status", "planning|active|on-hold|completed"))
                        .arg(
                            opt("completion", "Percent complete 0-100")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(opt("due", "Due date YYYY-MM-DD"))
                        .arg(opt("budget", "Budget amount"))
                        .arg(opt("client", "Client name"))
                        .arg(opt("location", "Site location")),
                )
                .subcommand(
                    Command::new("complete")
                        .about("Mark a project completed and stamp its end date")
                        .arg(Arg::new("name").required(true))
                        .arg(opt("date", "End date, defaults to today")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("task")
                .about("Manage project tasks")
                .subcommand(
                    Command::new("add")
                        .arg(req("project", "Project name"))
                        .arg(req("title", "Task title"))
                        .arg(opt("description", "Free-form description"))
                        .arg(
                            opt("status", "todo|in-progress|completed|blocked|review")
                                .default_value("todo"),
                        )
                        .arg(opt("priority", "low|medium|high|urgent").default_value("medium"))
                        .arg(opt("start", "Start date YYYY-MM-DD"))
                        .arg(opt("due", "Due date YYYY-MM-DD")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(opt("project", "Project name"))
                        .arg(opt("status", "Only tasks with this status"))
                        .arg(
                            Arg::new("hide-completed")
                                .long("hide-completed")
                                .action(ArgAction::SetTrue),
                        )
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("status")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("status").required(true)),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .arg(req("project", "Project name"))
                        .arg(req("date", "Date YYYY-MM-DD"))
                        .arg(req("amount", "Positive amount"))
                        .arg(req("type", "income|expense"))
                        .arg(req("category", "Category (free text)"))
                        .arg(opt("description", "Description")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(opt("project", "Project name"))
                        .arg(timeframe_arg())
                        .arg(view_arg())
                        .arg(opt("limit", "Maximum rows").value_parser(value_parser!(usize)))
                        .args(json_flags()),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage the transaction category vocabulary")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Category name"))
                        .arg(req("type", "income|expense")),
                )
                .subcommand(Command::new("list").arg(opt("type", "income|expense")))
                .subcommand(
                    Command::new("rm")
                        .arg(req("name", "Category name"))
                        .arg(req("type", "income|expense")),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Financial and progress reports")
                .subcommand(
                    Command::new("pl")
                        .about("Profit & loss for one project")
                        .arg(req("project", "Project name"))
                        .arg(timeframe_arg())
                        .arg(view_arg())
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("dashboard")
                        .about("Portfolio-wide stats")
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("performance")
                        .about("Budget and schedule health for one project")
                        .arg(req("project", "Project name"))
                        .args(json_flags()),
                ),
        )
        .subcommand(
            Command::new("timeline")
                .about("Gantt-style timelines")
                .subcommand(
                    Command::new("projects")
                        .arg(opt("status", "Only projects with this status"))
                        .arg(width_arg())
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("tasks")
                        .arg(req("project", "Project name"))
                        .arg(
                            Arg::new("hide-completed")
                                .long("hide-completed")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(width_arg())
                        .args(json_flags()),
                ),
        )
        .subcommand(
            Command::new("import").subcommand(
                Command::new("transactions").arg(
                    Arg::new("path")
                        .required(true)
                        .help("CSV with header project,date,amount,type,category,description"),
                ),
            ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(opt("format", "csv|json").default_value("csv"))
                    .arg(req("out", "Output path"))
                    .arg(opt("project", "Only this project")),
            ),
        )
        .subcommand(
            Command::new("sync")
                .about("Pull projects, tasks and transactions from the hosted row store")
                .arg(opt("url", "Base URL of the hosted store"))
                .arg(opt("key", "API key for the hosted store")),
        )
        .subcommand(
            Command::new("settings")
                .about("Show or change settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("currency").arg(Arg::new("currency").required(true)),
                )
                .subcommand(
                    Command::new("remote")
                        .arg(req("url", "Base URL of the hosted store"))
                        .arg(req("key", "API key for the hosted store")),
                ),
        )
        .subcommand(Command::new("doctor").about("Check data for inconsistencies"))
}
