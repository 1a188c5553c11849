// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Task, TaskStatus};
use crate::store::{self, NewTask};
use crate::timeline::task_due_badge;
use crate::utils::{fmt_opt_date, maybe_print_json, parse_opt_date, pretty_table, resolve_today};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("status", sub)) => set_status(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute("DELETE FROM tasks WHERE id=?1", params![id])?;
            if n == 0 {
                bail!("Task #{} not found", id);
            }
            println!("Removed task #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let project = sub.get_one::<String>("project").unwrap();
    let today = resolve_today(sub)?;
    let status: TaskStatus = sub.get_one::<String>("status").unwrap().parse()?;
    let task = NewTask {
        remote_id: None,
        project_id: store::id_for_project(conn, project)?,
        title: sub.get_one::<String>("title").unwrap().trim().to_string(),
        description: sub.get_one::<String>("description").cloned(),
        status,
        priority: sub.get_one::<String>("priority").unwrap().parse()?,
        start_date: parse_opt_date(sub.get_one::<String>("start"))?,
        due_date: parse_opt_date(sub.get_one::<String>("due"))?,
        completed_at: (status == TaskStatus::Completed).then_some(today),
        created_at: today,
    };
    let id = store::insert_task(conn, &task)?;
    println!("Added task #{} '{}' to {}", id, task.title, project);
    Ok(())
}

pub fn query_tasks(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Task>> {
    let project_id = sub
        .get_one::<String>("project")
        .map(|name| store::id_for_project(conn, name))
        .transpose()?;
    let status = sub
        .get_one::<String>("status")
        .map(|s| s.parse::<TaskStatus>())
        .transpose()?;
    let hide_completed = sub.get_flag("hide-completed");

    let mut tasks = store::load_tasks(conn, project_id)?;
    tasks.retain(|t| {
        status.is_none_or(|s| t.status == s) && !(hide_completed && t.is_complete())
    });
    Ok(tasks)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let tasks = query_tasks(conn, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &tasks)? {
        return Ok(());
    }
    let today = resolve_today(sub)?;
    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.title.clone(),
                t.status.to_string(),
                t.priority.to_string(),
                fmt_opt_date(t.due_date),
                task_due_badge(t, today)
                    .map(|b| b.label().to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["#", "Title", "Status", "Priority", "Due", ""], rows)
    );
    Ok(())
}

fn set_status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let status: TaskStatus = sub.get_one::<String>("status").unwrap().parse()?;
    let task = store::load_task(conn, id)?;
    let completed_at = match status {
        TaskStatus::Completed => task.completed_at.or(Some(resolve_today(sub)?)),
        _ => None,
    };
    conn.execute(
        "UPDATE tasks SET status=?1, completed_at=?2 WHERE id=?3",
        params![status, completed_at, id],
    )?;
    println!("Task #{} '{}' is now {}", id, task.title, status);
    Ok(())
}
