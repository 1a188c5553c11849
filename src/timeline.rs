// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Gantt-style layout: a shared chart window, per-item bars expressed as
//! percentages of that window, month axis runs and due-date flags.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::financials::month_label;
use crate::models::{Project, Task};

/// Padding added on both sides of the chart window.
pub const WINDOW_BUFFER_DAYS: i64 = 7;
/// Window length when there is nothing to lay out.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;
pub const PROJECT_FALLBACK_DAYS: i64 = 14;
pub const TASK_FALLBACK_DAYS: i64 = 7;
pub const DUE_SOON_DAYS: i64 = 7;
/// Tasks due within this many days get the stronger "due soon" badge.
pub const TASK_URGENT_DAYS: i64 = 3;

/// Anything that can be drawn as a bar on the timeline.
pub trait Schedulable {
    fn item_id(&self) -> i64;
    fn start_date(&self) -> NaiveDate;
    fn end_date(&self) -> Option<NaiveDate>;
    fn due_date(&self) -> Option<NaiveDate>;
    /// Bar length used when neither an end nor a due date is known.
    fn fallback_span_days(&self) -> i64;
    fn is_complete(&self) -> bool;
}

impl Schedulable for Project {
    fn item_id(&self) -> i64 {
        self.id
    }

    fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn fallback_span_days(&self) -> i64 {
        PROJECT_FALLBACK_DAYS
    }

    fn is_complete(&self) -> bool {
        Project::is_complete(self)
    }
}

impl Schedulable for Task {
    fn item_id(&self) -> i64 {
        self.id
    }

    // Tasks without an explicit start begin on the day they were created.
    fn start_date(&self) -> NaiveDate {
        self.start_date.unwrap_or(self.created_at)
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.completed_at
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn fallback_span_days(&self) -> i64 {
        TASK_FALLBACK_DAYS
    }

    fn is_complete(&self) -> bool {
        Task::is_complete(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ChartWindow {
    /// Length used as the percentage denominator. Never zero.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days().max(1)
    }

    /// Position of `date` as a percentage of the window, used for the today
    /// marker and due-date markers.
    pub fn offset_percent(&self, date: NaiveDate) -> f64 {
        percent((date - self.start).num_days(), self.span_days())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineBar {
    pub item_id: i64,
    pub left_percent: f64,
    pub width_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub label: String,
    pub start_index: i64,
    pub day_width: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DueDateStatus {
    pub overdue: bool,
    pub due_soon: bool,
}

/// Task list badge, finer grained than [`DueDateStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DueBadge {
    Overdue,
    DueSoon,
    DueThisWeek,
}

impl DueBadge {
    pub fn label(&self) -> &'static str {
        match self {
            DueBadge::Overdue => "Overdue",
            DueBadge::DueSoon => "Due soon",
            DueBadge::DueThisWeek => "Due this week",
        }
    }
}

fn percent(days: i64, span: i64) -> f64 {
    days as f64 / span as f64 * 100.0
}

/// End date used for the bar and the window: end, then due, then the start.
fn last_known_date<T: Schedulable>(item: &T) -> NaiveDate {
    item.end_date()
        .or_else(|| item.due_date())
        .unwrap_or_else(|| item.start_date())
}

pub fn compute_chart_window<T: Schedulable>(items: &[T], today: NaiveDate) -> ChartWindow {
    let earliest = items.iter().map(Schedulable::start_date).min();
    let latest = items.iter().map(last_known_date).max();
    match (earliest, latest) {
        (Some(start), Some(end)) => ChartWindow {
            start: start - Duration::days(WINDOW_BUFFER_DAYS),
            end: end + Duration::days(WINDOW_BUFFER_DAYS),
        },
        _ => ChartWindow {
            start: today,
            end: today + Duration::days(DEFAULT_WINDOW_DAYS),
        },
    }
}

pub fn resolve_end<T: Schedulable>(item: &T) -> NaiveDate {
    item.end_date()
        .or_else(|| item.due_date())
        .unwrap_or_else(|| item.start_date() + Duration::days(item.fallback_span_days()))
}

pub fn bar_position<T: Schedulable>(item: &T, window: &ChartWindow) -> TimelineBar {
    let span = window.span_days();
    let start = item.start_date();
    let offset = (start - window.start).num_days();
    let duration = (resolve_end(item) - start).num_days().max(1);
    TimelineBar {
        item_id: item.item_id(),
        left_percent: percent(offset, span),
        width_percent: percent(duration, span),
    }
}

/// Bars for every item against one shared window.
pub fn layout<T: Schedulable>(items: &[T], window: &ChartWindow) -> Vec<TimelineBar> {
    items.iter().map(|item| bar_position(item, window)).collect()
}

/// Splits the window's days (both ends included) into same-month runs.
pub fn month_buckets(window: &ChartWindow) -> Vec<MonthBucket> {
    let mut out: Vec<MonthBucket> = Vec::new();
    let mut current: Option<(i32, u32)> = None;
    for (index, day) in window.start.iter_days().take_while(|d| *d <= window.end).enumerate() {
        let key = (day.year(), day.month());
        if current == Some(key) {
            if let Some(last) = out.last_mut() {
                last.day_width += 1;
            }
            continue;
        }
        current = Some(key);
        out.push(MonthBucket {
            label: month_label(key.0, key.1),
            start_index: index as i64,
            day_width: 1,
        });
    }
    out
}

pub fn due_date_status<T: Schedulable>(item: &T, today: NaiveDate) -> DueDateStatus {
    let Some(due) = item.due_date() else {
        return DueDateStatus::default();
    };
    let overdue = due < today && !item.is_complete();
    let days_left = (due - today).num_days();
    let due_soon = !overdue && (0..=DUE_SOON_DAYS).contains(&days_left);
    DueDateStatus { overdue, due_soon }
}

/// Badge shown next to a task in the task list. Ignores completion, like the
/// list itself does.
pub fn task_due_badge(task: &Task, today: NaiveDate) -> Option<DueBadge> {
    let due = task.due_date?;
    let days_left = (due - today).num_days();
    if days_left < 0 {
        Some(DueBadge::Overdue)
    } else if days_left <= TASK_URGENT_DAYS {
        Some(DueBadge::DueSoon)
    } else if days_left <= DUE_SOON_DAYS {
        Some(DueBadge::DueThisWeek)
    } else {
        None
    }
}
