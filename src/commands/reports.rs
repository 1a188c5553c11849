// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::dashboard::{self, DashboardStats, PerformanceReport};
use crate::financials::{self, CategoryTotal, FinancialsSummary, MonthlyTotal, Timeframe, TypeView};
use crate::store;
use crate::utils::{fmt_money, fmt_percent, get_currency, maybe_print_json, pretty_table, resolve_today};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("pl", sub)) => profit_and_loss(conn, sub)?,
        Some(("dashboard", sub)) => overview(conn, sub)?,
        Some(("performance", sub)) => performance(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct PlReport {
    pub project: String,
    pub summary: FinancialsSummary,
    pub by_category: Vec<CategoryTotal>,
    pub by_month: Vec<MonthlyTotal>,
}

pub fn build_pl(conn: &Connection, sub: &clap::ArgMatches) -> Result<PlReport> {
    let project = store::project_by_name(conn, sub.get_one::<String>("project").unwrap())?;
    let timeframe: Timeframe = sub.get_one::<String>("timeframe").unwrap().parse()?;
    let view: TypeView = sub.get_one::<String>("view").unwrap().parse()?;
    let today = resolve_today(sub)?;

    let all = store::load_transactions(conn, Some(project.id))?;
    let rows = financials::filter_transactions(&all, timeframe, view, today);
    Ok(PlReport {
        summary: financials::summarize(&rows, project.budget),
        by_category: financials::group_by_category(&rows),
        by_month: financials::group_by_month(&rows),
        project: project.name,
    })
}

fn profit_and_loss(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let report = build_pl(conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let s = &report.summary;
    println!("{}", report.project);
    println!(
        "{}",
        pretty_table(
            &["Budget", "Income", "Expenses", "Profit", "Margin"],
            vec![vec![
                fmt_money(&s.total_budget, &ccy),
                fmt_money(&s.total_income, &ccy),
                fmt_money(&s.total_expenses, &ccy),
                fmt_money(&s.current_profit, &ccy),
                fmt_percent(&s.profit_margin),
            ]],
        )
    );

    let cats = report
        .by_category
        .iter()
        .map(|c| vec![c.name.clone(), fmt_money(&c.value, &ccy)])
        .collect();
    println!("{}", pretty_table(&["Category", "Amount"], cats));

    let months = report
        .by_month
        .iter()
        .map(|m| {
            vec![
                m.label.clone(),
                fmt_money(&m.income, &ccy),
                fmt_money(&m.expense, &ccy),
                fmt_money(&m.profit, &ccy),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expense", "Profit"], months)
    );
    Ok(())
}

pub fn build_dashboard(conn: &Connection, sub: &clap::ArgMatches) -> Result<DashboardStats> {
    let projects = store::load_projects(conn)?;
    let transactions = store::load_transactions(conn, None)?;
    Ok(dashboard::dashboard_stats(
        &projects,
        &transactions,
        resolve_today(sub)?,
    ))
}

fn overview(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let stats = build_dashboard(conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    println!(
        "{}",
        pretty_table(
            &["Active", "Completed", "Revenue", "Profit"],
            vec![vec![
                stats.active_projects.to_string(),
                stats.completed_projects.to_string(),
                fmt_money(&stats.total_revenue, &ccy),
                fmt_money(&stats.total_profit, &ccy),
            ]],
        )
    );
    let deadlines = stats
        .upcoming_deadlines
        .iter()
        .map(|d| vec![d.project_name.clone(), d.due_date.to_string()])
        .collect();
    println!("{}", pretty_table(&["Upcoming deadline", "Due"], deadlines));
    Ok(())
}

pub fn build_performance(conn: &Connection, sub: &clap::ArgMatches) -> Result<PerformanceReport> {
    let project = store::project_by_name(conn, sub.get_one::<String>("project").unwrap())?;
    let transactions = store::load_transactions(conn, Some(project.id))?;
    let tasks = store::load_tasks(conn, Some(project.id))?;
    let summary = financials::summarize(&transactions, project.budget);
    Ok(dashboard::performance(
        &project,
        &summary,
        &transactions,
        &tasks,
        resolve_today(sub)?,
    ))
}

fn performance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let report = build_performance(conn, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let yes_no = |b: bool| (if b { "yes" } else { "no" }).to_string();
    println!(
        "{}",
        pretty_table(
            &["Completion", "Budget used", "On budget", "Days left", "On schedule"],
            vec![vec![
                format!("{}%", report.completion),
                fmt_percent(&report.budget_used_percent),
                yes_no(report.on_budget),
                report
                    .days_left
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".into()),
                yes_no(report.on_schedule),
            ]],
        )
    );
    let breakdown = report
        .expense_breakdown
        .iter()
        .map(|c| vec![c.name.clone(), fmt_money(&c.value, &ccy)])
        .collect();
    println!("{}", pretty_table(&["Expense category", "Spent"], breakdown));
    let counts = report
        .task_counts
        .iter()
        .map(|c| vec![c.status.to_string(), c.count.to_string()])
        .collect();
    println!("{}", pretty_table(&["Task status", "Count"], counts));
    Ok(())
}
