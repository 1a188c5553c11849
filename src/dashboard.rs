// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Portfolio-wide stats and per-project health built on top of the
//! aggregator.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::financials::{self, CategoryTotal, FinancialsSummary};
use crate::models::{Project, ProjectStatus, Task, TaskStatus, Transaction};

pub const UPCOMING_DEADLINE_LIMIT: usize = 5;
/// Spending may run this many points ahead of completion before a project
/// counts as over budget.
pub const BUDGET_TOLERANCE_PERCENT: i64 = 10;
/// Minimum completion for a project with an end date to count as on schedule.
pub const MIN_PROGRESS_PERCENT: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deadline {
    pub project_id: i64,
    pub project_name: String,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub active_projects: usize,
    pub completed_projects: usize,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub upcoming_deadlines: Vec<Deadline>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub completion: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: TaskStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerformanceReport {
    pub completion: u8,
    pub budget_used_percent: Decimal,
    pub on_budget: bool,
    pub days_left: Option<i64>,
    pub on_schedule: bool,
    pub progress: Vec<ProgressPoint>,
    pub expense_breakdown: Vec<CategoryTotal>,
    pub task_counts: Vec<StatusCount>,
}

pub fn dashboard_stats(
    projects: &[Project],
    transactions: &[Transaction],
    today: NaiveDate,
) -> DashboardStats {
    let count = |status: ProjectStatus| projects.iter().filter(|p| p.status == status).count();

    let mut total_revenue = Decimal::ZERO;
    let mut total_profit = Decimal::ZERO;
    for project in projects {
        let rows: Vec<Transaction> = transactions
            .iter()
            .filter(|t| t.project_id == project.id)
            .cloned()
            .collect();
        let summary = financials::summarize(&rows, project.budget);
        total_revenue += summary.total_income;
        total_profit += summary.current_profit;
    }

    let mut upcoming: Vec<Deadline> = projects
        .iter()
        .filter_map(|p| {
            let due = p.due_date.or(p.end_date)?;
            (due > today).then(|| Deadline {
                project_id: p.id,
                project_name: p.name.clone(),
                due_date: due,
            })
        })
        .collect();
    upcoming.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.project_id.cmp(&b.project_id)));
    upcoming.truncate(UPCOMING_DEADLINE_LIMIT);

    DashboardStats {
        active_projects: count(ProjectStatus::Active),
        completed_projects: count(ProjectStatus::Completed),
        total_revenue,
        total_profit,
        upcoming_deadlines: upcoming,
    }
}

pub fn budget_used_percent(expenses: Decimal, budget: Decimal) -> Decimal {
    if budget > Decimal::ZERO {
        expenses / budget * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

pub fn task_status_counts(tasks: &[Task]) -> Vec<StatusCount> {
    TaskStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: tasks.iter().filter(|t| t.status == *status).count(),
        })
        .collect()
}

pub fn performance(
    project: &Project,
    summary: &FinancialsSummary,
    transactions: &[Transaction],
    tasks: &[Task],
    today: NaiveDate,
) -> PerformanceReport {
    let used = budget_used_percent(summary.total_expenses, project.budget);
    let allowance = Decimal::from(i64::from(project.completion) + BUDGET_TOLERANCE_PERCENT);
    let days_left = project.end_date.map(|end| (end - today).num_days());
    let on_schedule = match days_left {
        Some(days) => days > 0 && project.completion >= MIN_PROGRESS_PERCENT,
        None => project.completion > 0,
    };

    let mut progress = vec![
        ProgressPoint {
            date: project.start_date,
            completion: 0,
        },
        ProgressPoint {
            date: today,
            completion: project.completion,
        },
    ];
    if let Some(end) = project.end_date.filter(|end| *end > today) {
        progress.push(ProgressPoint {
            date: end,
            completion: 100,
        });
    }

    PerformanceReport {
        completion: project.completion,
        budget_used_percent: used,
        on_budget: used <= allowance,
        days_left,
        on_schedule,
        progress,
        expense_breakdown: financials::expense_breakdown(transactions),
        task_counts: task_status_counts(tasks),
    }
}
