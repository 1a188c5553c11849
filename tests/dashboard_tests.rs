// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sitebook::dashboard;
use sitebook::financials;
use sitebook::models::{
    Project, ProjectStatus, Task, TaskPriority, TaskStatus, Transaction, TransactionType,
};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn project(id: i64, status: ProjectStatus, due: Option<&str>) -> Project {
    Project {
        id,
        name: format!("P{}", id),
        client: "Client".into(),
        location: String::new(),
        description: String::new(),
        budget: dec!(10000),
        start_date: d("2024-01-01"),
        end_date: None,
        due_date: due.map(d),
        status,
        completion: 50,
    }
}

fn tx(project_id: i64, amount: Decimal, kind: TransactionType) -> Transaction {
    Transaction {
        id: 0,
        project_id,
        date: d("2024-02-01"),
        amount,
        r#type: kind,
        category: "Misc".into(),
        description: String::new(),
    }
}

#[test]
fn stats_count_projects_and_roll_up_money() {
    let today = d("2024-03-01");
    let projects = vec![
        project(1, ProjectStatus::Active, Some("2024-04-01")),
        project(2, ProjectStatus::Active, None),
        project(3, ProjectStatus::Completed, Some("2024-02-01")),
        project(4, ProjectStatus::Planning, Some("2024-03-15")),
    ];
    let txs = vec![
        tx(1, dec!(1000), TransactionType::Income),
        tx(1, dec!(300), TransactionType::Expense),
        tx(3, dec!(500), TransactionType::Income),
        tx(3, dec!(700), TransactionType::Expense),
    ];
    let stats = dashboard::dashboard_stats(&projects, &txs, today);
    assert_eq!(stats.active_projects, 2);
    assert_eq!(stats.completed_projects, 1);
    assert_eq!(stats.total_revenue, dec!(1500));
    assert_eq!(stats.total_profit, dec!(500));

    let names: Vec<&str> = stats
        .upcoming_deadlines
        .iter()
        .map(|d| d.project_name.as_str())
        .collect();
    assert_eq!(names, ["P4", "P1"]);
}

#[test]
fn upcoming_deadlines_are_capped_and_fall_back_to_end_date() {
    let today = d("2024-01-01");
    let mut projects: Vec<Project> = (1..=7)
        .map(|i| {
            let due = format!("2024-02-{:02}", 10 - i);
            project(i, ProjectStatus::Active, Some(due.as_str()))
        })
        .collect();
    let mut ended = project(8, ProjectStatus::Completed, None);
    ended.end_date = Some(d("2024-01-02"));
    projects.push(ended);
    let today_due = project(9, ProjectStatus::Active, Some("2024-01-01"));
    projects.push(today_due);

    let stats = dashboard::dashboard_stats(&projects, &[], today);
    assert_eq!(stats.upcoming_deadlines.len(), dashboard::UPCOMING_DEADLINE_LIMIT);
    assert_eq!(stats.upcoming_deadlines[0].project_id, 8);
    assert_eq!(stats.upcoming_deadlines[1].due_date, d("2024-02-03"));
    assert!(stats.upcoming_deadlines.iter().all(|d| d.project_id != 9));
}

#[test]
fn budget_percent_is_zero_for_zero_budget() {
    assert_eq!(dashboard::budget_used_percent(dec!(50), Decimal::ZERO), Decimal::ZERO);
    assert_eq!(dashboard::budget_used_percent(dec!(250), dec!(1000)), dec!(25));
}

#[test]
fn performance_reports_budget_and_schedule_health() {
    let today = d("2024-03-01");
    let mut p = project(1, ProjectStatus::Active, None);
    p.completion = 30;
    p.end_date = Some(d("2024-06-01"));
    let txs = vec![
        tx(1, dec!(3500), TransactionType::Expense),
        tx(1, dec!(2000), TransactionType::Income),
    ];
    let tasks = vec![Task {
        id: 1,
        project_id: 1,
        title: "Pour slab".into(),
        description: None,
        status: TaskStatus::Blocked,
        priority: TaskPriority::High,
        start_date: None,
        due_date: None,
        completed_at: None,
        created_at: d("2024-01-02"),
    }];
    let summary = financials::summarize(&txs, p.budget);
    let report = dashboard::performance(&p, &summary, &txs, &tasks, today);

    assert_eq!(report.budget_used_percent, dec!(35));
    assert!(report.on_budget);
    assert_eq!(report.days_left, Some(92));
    assert!(report.on_schedule);
    assert_eq!(report.progress.len(), 3);
    assert_eq!(report.progress[2].completion, 100);
    assert_eq!(report.expense_breakdown.len(), 1);

    let blocked = report
        .task_counts
        .iter()
        .find(|c| c.status == TaskStatus::Blocked)
        .unwrap();
    assert_eq!(blocked.count, 1);
    assert_eq!(report.task_counts.len(), TaskStatus::ALL.len());
}

#[test]
fn overspent_project_is_off_budget() {
    let today = d("2024-03-01");
    let mut p = project(1, ProjectStatus::Active, None);
    p.completion = 20;
    let txs = vec![tx(1, dec!(3100), TransactionType::Expense)];
    let summary = financials::summarize(&txs, p.budget);
    let report = dashboard::performance(&p, &summary, &txs, &[], today);
    assert!(!report.on_budget);
    assert_eq!(report.days_left, None);
    assert!(report.on_schedule);
    assert_eq!(report.progress.len(), 2);
}
