// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal_macros::dec;
use sitebook::commands::{reports, timeline};
use sitebook::timeline::TimelineBar;
use sitebook::{cli, db};

fn seeded_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO projects(id, name, client, budget, start_date, due_date, end_date, status, completion)
        VALUES (1, 'Harbor Deck', 'Acme', '10000', '2024-01-01', '2024-01-15', NULL, 'active', 40),
               (2, 'Mill Loft', 'Birch', '20000', '2024-01-10', '2024-01-29', NULL, 'planning', 0);
        INSERT INTO transactions(project_id, date, amount, type, category)
        VALUES (1, '2024-01-05', '1000', 'income', 'Payment'),
               (1, '2024-01-20', '400', 'expense', 'Materials'),
               (1, '2024-02-02', '100', 'expense', 'Labor'),
               (2, '2024-01-12', '50', 'expense', 'Permits');
        INSERT INTO tasks(project_id, title, status, start_date, due_date, created_at)
        VALUES (1, 'Survey', 'completed', '2024-01-01', '2024-01-03', '2024-01-01'),
               (1, 'Footings', 'in-progress', NULL, '2024-01-12', '2024-01-04');
        "#,
    )
    .unwrap();
    conn
}

fn leaf(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["sitebook"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let (_, group) = matches.subcommand().unwrap();
    group.subcommand().unwrap().1.clone()
}

#[test]
fn pl_report_rolls_up_one_project() {
    let conn = seeded_conn();
    let m = leaf(&["report", "pl", "--project", "Harbor Deck"]);
    let report = reports::build_pl(&conn, &m).unwrap();
    assert_eq!(report.summary.total_income, dec!(1000));
    assert_eq!(report.summary.total_expenses, dec!(500));
    assert_eq!(report.summary.current_profit, dec!(500));
    assert_eq!(report.summary.profit_margin, dec!(50));
    assert_eq!(report.by_category.len(), 3);
    assert_eq!(report.by_month.len(), 2);
}

#[test]
fn pl_report_respects_timeframe_and_view() {
    let conn = seeded_conn();
    let m = leaf(&[
        "report",
        "pl",
        "--project",
        "Harbor Deck",
        "--timeframe",
        "30days",
        "--view",
        "expense",
        "--today",
        "2024-02-10",
    ]);
    let report = reports::build_pl(&conn, &m).unwrap();
    assert_eq!(report.summary.total_income, dec!(0));
    assert_eq!(report.summary.total_expenses, dec!(500));
    assert_eq!(report.summary.profit_margin, dec!(0));
}

#[test]
fn dashboard_lists_future_deadlines() {
    let conn = seeded_conn();
    let m = leaf(&["report", "dashboard", "--today", "2024-01-14"]);
    let stats = reports::build_dashboard(&conn, &m).unwrap();
    assert_eq!(stats.active_projects, 1);
    assert_eq!(stats.total_revenue, dec!(1000));
    assert_eq!(stats.total_profit, dec!(450));
    let names: Vec<&str> = stats
        .upcoming_deadlines
        .iter()
        .map(|d| d.project_name.as_str())
        .collect();
    assert_eq!(names, ["Harbor Deck", "Mill Loft"]);
}

#[test]
fn performance_counts_tasks_for_project() {
    let conn = seeded_conn();
    let m = leaf(&["report", "performance", "--project", "Harbor Deck", "--today", "2024-01-20"]);
    let report = reports::build_performance(&conn, &m).unwrap();
    assert_eq!(report.budget_used_percent, dec!(5));
    assert!(report.on_budget);
    let total: usize = report.task_counts.iter().map(|c| c.count).sum();
    assert_eq!(total, 2);
}

#[test]
fn project_timeline_shares_one_window() {
    let conn = seeded_conn();
    let m = leaf(&["timeline", "projects", "--today", "2024-01-14"]);
    let view = timeline::project_timeline(&conn, &m).unwrap();
    assert_eq!(view.window.start.to_string(), "2023-12-25");
    assert_eq!(view.window.end.to_string(), "2024-02-05");
    assert_eq!(view.rows.len(), 2);

    let harbor = &view.rows[0];
    assert_eq!(harbor.name, "Harbor Deck");
    assert!((harbor.bar.left_percent - 16.67).abs() < 0.01);
    assert!((harbor.bar.width_percent - 33.33).abs() < 0.01);
    assert!(harbor.flags.due_soon);
    assert!(!harbor.flags.overdue);

    let axis = timeline::render_axis(&view, 42);
    assert!(axis.contains("Jan 2024"), "{}", axis);
}

#[test]
fn task_timeline_can_hide_completed() {
    let conn = seeded_conn();
    let m = leaf(&["timeline", "tasks", "--project", "Harbor Deck", "--today", "2024-01-14"]);
    let view = timeline::task_timeline(&conn, &m).unwrap();
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[0].name, "Survey");
    let footings = &view.rows[1];
    assert!(footings.flags.overdue);
    assert_eq!(footings.detail, "Overdue");

    let m = leaf(&[
        "timeline",
        "tasks",
        "--project",
        "Harbor Deck",
        "--hide-completed",
        "--today",
        "2024-01-14",
    ]);
    let view = timeline::task_timeline(&conn, &m).unwrap();
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].name, "Footings");
}

#[test]
fn track_draws_bar_then_markers() {
    let bar = TimelineBar {
        item_id: 1,
        left_percent: 20.0,
        width_percent: 30.0,
    };
    let track = timeline::render_track(&bar, Some(70.0), 90.0, 10);
    assert_eq!(track, "  ███  | :");
    assert_eq!(track.chars().count(), 10);

    let tiny = TimelineBar {
        item_id: 2,
        left_percent: 100.0,
        width_percent: 0.5,
    };
    let track = timeline::render_track(&tiny, None, 0.0, 4);
    assert_eq!(track, ":  █");
}

#[test]
fn markers_outside_window_are_skipped() {
    let bar = TimelineBar {
        item_id: 1,
        left_percent: 0.0,
        width_percent: 50.0,
    };
    assert_eq!(timeline::render_track(&bar, None, 130.0, 4), "██  ");
    assert_eq!(timeline::render_track(&bar, Some(-5.0), -20.0, 4), "██  ");
    assert_eq!(timeline::render_track(&bar, Some(100.0), 75.0, 4), "██ |");
}
