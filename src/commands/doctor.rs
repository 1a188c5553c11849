// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::ProjectStatus;
use crate::store;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

/// Data-quality findings as `(issue, detail)` pairs.
pub fn findings(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut rows = Vec::new();
    let projects = store::load_projects(conn)?;

    for p in &projects {
        // 1) Progress and status disagree
        if p.completion >= 100 && p.status != ProjectStatus::Completed {
            rows.push(("complete_not_closed".into(), p.name.clone()));
        }
        // 2) Completed projects must carry an end date
        if p.status == ProjectStatus::Completed && p.end_date.is_none() {
            rows.push(("completed_without_end_date".into(), p.name.clone()));
        }
        // 3) Ends before it starts
        if let Some(end) = p.end_date.filter(|end| *end < p.start_date) {
            rows.push((
                "end_before_start".into(),
                format!("{} ({} < {})", p.name, end, p.start_date),
            ));
        }
    }

    // 4) Tasks due after their project's due date
    for t in store::load_tasks(conn, None)? {
        let Some(project) = projects.iter().find(|p| p.id == t.project_id) else {
            continue;
        };
        if let (Some(task_due), Some(project_due)) = (t.due_date, project.due_date) {
            if task_due > project_due {
                rows.push((
                    "task_due_after_project".into(),
                    format!("#{} {} ({} > {})", t.id, t.title, task_due, project_due),
                ));
            }
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows: Vec<Vec<String>> = findings(conn)?
        .into_iter()
        .map(|(issue, detail)| vec![issue, detail])
        .collect();
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
