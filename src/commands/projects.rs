// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Project, ProjectStatus};
use crate::store::{self, NewProject, check_completion};
use crate::utils::{
    fmt_money, fmt_opt_date, get_currency, maybe_print_json, parse_date, parse_decimal,
    parse_opt_date, pretty_table, resolve_today,
};
use anyhow::Result;
use rusqlite::{Connection, params};
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("update", sub)) => update(conn, sub)?,
        Some(("complete", sub)) => complete(conn, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let id = store::id_for_project(conn, name)?;
            conn.execute("DELETE FROM projects WHERE id=?1", params![id])?;
            println!("Removed project '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let project = NewProject {
        remote_id: None,
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        client: sub.get_one::<String>("client").unwrap().trim().to_string(),
        location: sub.get_one::<String>("location").cloned().unwrap_or_default(),
        description: sub
            .get_one::<String>("description")
            .cloned()
            .unwrap_or_default(),
        budget: parse_decimal(sub.get_one::<String>("budget").unwrap())?,
        start_date: parse_date(sub.get_one::<String>("start").unwrap())?,
        end_date: None,
        due_date: parse_opt_date(sub.get_one::<String>("due"))?,
        status: sub.get_one::<String>("status").unwrap().parse()?,
        completion: *sub.get_one::<i64>("completion").unwrap(),
    };
    store::insert_project(conn, &project)?;
    info!(name = %project.name, "project added");
    println!(
        "Added project '{}' for {} (budget {})",
        project.name, project.client, project.budget
    );
    Ok(())
}

pub fn query_projects(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Project>> {
    let status = sub
        .get_one::<String>("status")
        .map(|s| s.parse::<ProjectStatus>())
        .transpose()?;
    let mut projects = store::load_projects(conn)?;
    if let Some(status) = status {
        projects.retain(|p| p.status == status);
    }
    Ok(projects)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let projects = query_projects(conn, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &projects)? {
        return Ok(());
    }
    let ccy = get_currency(conn)?;
    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.client.clone(),
                p.location.clone(),
                p.status.to_string(),
                format!("{}%", p.completion),
                fmt_money(&p.budget, &ccy),
                p.start_date.to_string(),
                fmt_opt_date(p.due_date),
                fmt_opt_date(p.end_date),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Name", "Client", "Location", "Status", "Done", "Budget", "Start", "Due", "End",
            ],
            rows,
        )
    );
    Ok(())
}

fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let mut project = store::project_by_name(conn, name)?;

    if let Some(s) = sub.get_one::<String>("status") {
        project.status = s.parse()?;
    }
    if let Some(c) = sub.get_one::<i64>("completion") {
        check_completion(*c)?;
        project.completion = *c as u8;
    }
    if let Some(d) = parse_opt_date(sub.get_one::<String>("due"))? {
        project.due_date = Some(d);
    }
    if let Some(b) = sub.get_one::<String>("budget") {
        project.budget = parse_decimal(b)?;
    }
    if let Some(c) = sub.get_one::<String>("client") {
        project.client = c.clone();
    }
    if let Some(l) = sub.get_one::<String>("location") {
        project.location = l.clone();
    }
    save(conn, &project)?;
    println!("Updated project '{}'", project.name);
    Ok(())
}

fn complete(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let end = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => resolve_today(sub)?,
    };
    let mut project = store::project_by_name(conn, name)?;
    project.status = ProjectStatus::Completed;
    project.completion = 100;
    project.end_date = Some(end);
    save(conn, &project)?;
    println!("Completed project '{}' on {}", project.name, end);
    Ok(())
}

fn save(conn: &Connection, p: &Project) -> Result<()> {
    NewProject::from(p).validate()?;
    conn.execute(
        "UPDATE projects SET client=?1, location=?2, budget=?3, end_date=?4, due_date=?5,
            status=?6, completion=?7 WHERE id=?8",
        params![
            p.client,
            p.location,
            p.budget.to_string(),
            p.end_date,
            p.due_date,
            p.status,
            p.completion,
            p.id
        ],
    )?;
    Ok(())
}
