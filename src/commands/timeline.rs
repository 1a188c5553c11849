// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{ProjectStatus, TaskStatus};
use crate::store;
use crate::timeline::{self, ChartWindow, DueDateStatus, MonthBucket, Schedulable, TimelineBar};
use crate::utils::{maybe_print_json, pretty_table, resolve_today};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

const BAR: char = '█';
const DUE_MARK: char = '|';
const TODAY_MARK: char = ':';

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("projects", sub)) => {
            let view = project_timeline(conn, sub)?;
            print_view(sub, &view)?;
        }
        Some(("tasks", sub)) => {
            let view = task_timeline(conn, sub)?;
            print_view(sub, &view)?;
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TimelineRow {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub detail: String,
    pub start: NaiveDate,
    pub due: Option<NaiveDate>,
    pub bar: TimelineBar,
    pub flags: DueDateStatus,
}

#[derive(Debug, Serialize)]
pub struct TimelineView {
    pub window: ChartWindow,
    pub months: Vec<MonthBucket>,
    pub today_percent: f64,
    pub rows: Vec<TimelineRow>,
}

fn build_view<T: Schedulable>(
    items: &[T],
    today: NaiveDate,
    describe: impl Fn(&T) -> (String, String, String),
) -> TimelineView {
    let window = timeline::compute_chart_window(items, today);
    let rows = items
        .iter()
        .map(|item| {
            let (name, status, detail) = describe(item);
            TimelineRow {
                id: item.item_id(),
                name,
                status,
                detail,
                start: item.start_date(),
                due: item.due_date(),
                bar: timeline::bar_position(item, &window),
                flags: timeline::due_date_status(item, today),
            }
        })
        .collect();
    TimelineView {
        months: timeline::month_buckets(&window),
        today_percent: window.offset_percent(today),
        window,
        rows,
    }
}

pub fn project_timeline(conn: &Connection, sub: &clap::ArgMatches) -> Result<TimelineView> {
    let today = resolve_today(sub)?;
    let status = sub
        .get_one::<String>("status")
        .map(|s| s.parse::<ProjectStatus>())
        .transpose()?;
    let mut projects = store::load_projects(conn)?;
    if let Some(status) = status {
        projects.retain(|p| p.status == status);
    }
    Ok(build_view(&projects, today, |p| {
        (
            p.name.clone(),
            p.status.to_string(),
            format!("{}% complete", p.completion),
        )
    }))
}

pub fn task_timeline(conn: &Connection, sub: &clap::ArgMatches) -> Result<TimelineView> {
    let today = resolve_today(sub)?;
    let project_id = store::id_for_project(conn, sub.get_one::<String>("project").unwrap())?;
    let mut tasks = store::load_tasks(conn, Some(project_id))?;
    if sub.get_flag("hide-completed") {
        tasks.retain(|t| t.status != TaskStatus::Completed);
    }
    tasks.sort_by_key(|t| (Schedulable::start_date(t), t.id));
    Ok(build_view(&tasks, today, |t| {
        (
            t.title.clone(),
            t.status.to_string(),
            timeline::task_due_badge(t, today)
                .map(|b| b.label().to_string())
                .unwrap_or_else(|| t.priority.to_string()),
        )
    }))
}

fn column(percent: f64, width: usize) -> usize {
    let col = (percent / 100.0 * width as f64).round();
    col.clamp(0.0, width as f64) as usize
}

/// One chart row: the bar, then due and today markers on the empty cells.
/// Markers outside the window are not drawn.
pub fn render_track(
    bar: &TimelineBar,
    due_percent: Option<f64>,
    today_percent: f64,
    width: usize,
) -> String {
    let mut cells = vec![' '; width];
    let start = column(bar.left_percent, width).min(width.saturating_sub(1));
    let len = column(bar.width_percent, width).max(1);
    for cell in cells.iter_mut().skip(start).take(len) {
        *cell = BAR;
    }
    let mut mark = |percent: f64, ch: char| {
        if !(0.0..=100.0).contains(&percent) {
            return;
        }
        let col = column(percent, width).min(width.saturating_sub(1));
        if let Some(cell) = cells.get_mut(col).filter(|c| **c == ' ') {
            *cell = ch;
        }
    };
    if let Some(p) = due_percent {
        mark(p, DUE_MARK);
    }
    mark(today_percent, TODAY_MARK);
    cells.into_iter().collect()
}

/// Month labels placed at the column where each month starts.
pub fn render_axis(view: &TimelineView, width: usize) -> String {
    let span = view.window.span_days() as f64;
    let mut cells = vec![' '; width];
    for bucket in &view.months {
        let start = column(bucket.start_index as f64 / span * 100.0, width);
        let room = column(bucket.day_width as f64 / span * 100.0, width);
        for (offset, ch) in bucket.label.chars().take(room).enumerate() {
            if let Some(cell) = cells.get_mut(start + offset) {
                *cell = ch;
            }
        }
    }
    cells.into_iter().collect::<String>().trim_end().to_string()
}

fn print_view(sub: &clap::ArgMatches, view: &TimelineView) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), view)? {
        return Ok(());
    }
    let width = *sub.get_one::<usize>("width").unwrap();
    let rows = view
        .rows
        .iter()
        .map(|r| {
            let flag = if r.flags.overdue {
                "OVERDUE"
            } else if r.flags.due_soon {
                "due soon"
            } else {
                ""
            };
            let due_percent = r.due.map(|d| view.window.offset_percent(d));
            vec![
                r.name.clone(),
                r.status.clone(),
                r.detail.clone(),
                flag.to_string(),
                render_track(&r.bar, due_percent, view.today_percent, width),
            ]
        })
        .collect();
    println!(
        "{} .. {}  ({} today, {} due)",
        view.window.start, view.window.end, TODAY_MARK, DUE_MARK
    );
    println!(
        "{}",
        pretty_table(&["Item", "Status", "", "", &render_axis(view, width)], rows)
    );
    Ok(())
}
