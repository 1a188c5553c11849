// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pull-only sync from a hosted PostgREST row store. Remote rows are
//! validated here; anything malformed is logged and skipped so the local
//! store only ever holds well-typed rows.

use crate::error::SitebookError;
use crate::models::TaskPriority;
use crate::store::{self, NewProject, NewTask, NewTransaction};
use crate::utils::{get_setting, http_client, parse_date};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteProject {
    pub id: String,
    pub name: String,
    pub client: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub budget: Decimal,
    pub start_date: String,
    pub end_date: Option<String>,
    pub due_date: Option<String>,
    pub status: String,
    pub completion: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteTask {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: Option<String>,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub completed_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteTransaction {
    pub id: String,
    pub project_id: String,
    pub date: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub description: Option<String>,
}

#[derive(Debug, Default)]
pub struct RemoteSnapshot {
    pub projects: Vec<RemoteProject>,
    pub tasks: Vec<RemoteTask>,
    pub transactions: Vec<RemoteTransaction>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub projects: usize,
    pub tasks: usize,
    pub transactions: usize,
    pub rejected: usize,
}

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let url = match m.get_one::<String>("url") {
        Some(u) => u.clone(),
        None => get_setting(conn, "remote_url")?
            .context("No remote URL; pass --url or run `settings remote`")?,
    };
    let key = match m.get_one::<String>("key") {
        Some(k) => k.clone(),
        None => get_setting(conn, "remote_key")?
            .context("No remote key; pass --key or run `settings remote`")?,
    };

    let snapshot = fetch_snapshot(&url, &key)?;
    let report = apply_snapshot(conn, &snapshot)?;
    println!(
        "Synced {} projects, {} tasks, {} transactions ({} rejected)",
        report.projects, report.tasks, report.transactions, report.rejected
    );
    Ok(())
}

fn fetch_table<T: DeserializeOwned>(
    client: &reqwest::blocking::Client,
    base: &str,
    key: &str,
    table: &str,
) -> Result<Vec<T>> {
    let url = format!("{}/rest/v1/{}?select=*", base.trim_end_matches('/'), table);
    let rows: Vec<T> = client
        .get(&url)
        .header("apikey", key)
        .bearer_auth(key)
        .send()
        .with_context(|| format!("GET {}", table))?
        .error_for_status()
        .with_context(|| format!("GET {}", table))?
        .json()
        .with_context(|| format!("Decode {} rows", table))?;
    info!(table, count = rows.len(), "fetched remote rows");
    Ok(rows)
}

pub fn fetch_snapshot(base: &str, key: &str) -> Result<RemoteSnapshot> {
    let client = http_client()?;
    Ok(RemoteSnapshot {
        projects: fetch_table(&client, base, key, "projects")?,
        tasks: fetch_table(&client, base, key, "tasks")?,
        transactions: fetch_table(&client, base, key, "transactions")?,
    })
}

/// Accepts plain dates and timestamps; only the calendar date is kept.
fn remote_date(table: &'static str, id: &str, raw: &str) -> Result<NaiveDate, SitebookError> {
    let day = raw.get(..10).unwrap_or(raw);
    parse_date(day).map_err(|e| SitebookError::rejected(table, id, e))
}

fn remote_opt_date(
    table: &'static str,
    id: &str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, SitebookError> {
    raw.map(|r| remote_date(table, id, r)).transpose()
}

pub fn to_new_project(r: &RemoteProject) -> Result<NewProject, SitebookError> {
    let reject = |e: SitebookError| SitebookError::rejected("projects", &r.id, e);
    let project = NewProject {
        remote_id: Some(r.id.clone()),
        name: r.name.clone(),
        client: r.client.clone(),
        location: r.location.clone().unwrap_or_default(),
        description: r.description.clone().unwrap_or_default(),
        budget: r.budget,
        start_date: remote_date("projects", &r.id, &r.start_date)?,
        end_date: remote_opt_date("projects", &r.id, r.end_date.as_deref())?,
        due_date: remote_opt_date("projects", &r.id, r.due_date.as_deref())?,
        status: r.status.parse().map_err(reject)?,
        completion: r.completion.unwrap_or(0),
    };
    project.validate().map_err(reject)?;
    Ok(project)
}

pub fn to_new_task(r: &RemoteTask, project_id: i64) -> Result<NewTask, SitebookError> {
    let reject = |e: SitebookError| SitebookError::rejected("tasks", &r.id, e);
    Ok(NewTask {
        remote_id: Some(r.id.clone()),
        project_id,
        title: r.title.clone(),
        description: r.description.clone(),
        status: r.status.parse().map_err(reject)?,
        priority: match r.priority.as_deref() {
            Some(p) => p.parse().map_err(reject)?,
            None => TaskPriority::Medium,
        },
        start_date: remote_opt_date("tasks", &r.id, r.start_date.as_deref())?,
        due_date: remote_opt_date("tasks", &r.id, r.due_date.as_deref())?,
        completed_at: remote_opt_date("tasks", &r.id, r.completed_at.as_deref())?,
        created_at: remote_date("tasks", &r.id, &r.created_at)?,
    })
}

pub fn to_new_transaction(
    r: &RemoteTransaction,
    project_id: i64,
) -> Result<NewTransaction, SitebookError> {
    let reject = |e: SitebookError| SitebookError::rejected("transactions", &r.id, e);
    let tx = NewTransaction {
        remote_id: Some(r.id.clone()),
        project_id,
        date: remote_date("transactions", &r.id, &r.date)?,
        amount: r.amount,
        r#type: r.kind.parse().map_err(reject)?,
        category: r.category.clone(),
        description: r.description.clone().unwrap_or_default(),
    };
    tx.validate().map_err(reject)?;
    Ok(tx)
}

fn local_project(
    conn: &Connection,
    table: &'static str,
    id: &str,
    remote_project: &str,
) -> Result<Result<i64, SitebookError>> {
    Ok(store::project_id_for_remote(conn, remote_project)?.ok_or_else(|| {
        SitebookError::rejected(table, id, format!("unknown project {}", remote_project))
    }))
}

/// Project names are unique locally; a remote project may not take a name
/// already held by a different project.
fn unclaimed_name(conn: &Connection, p: NewProject) -> Result<Result<NewProject, SitebookError>> {
    if store::project_name_taken(conn, &p.name, p.remote_id.as_deref())? {
        let id = p.remote_id.clone().unwrap_or_default();
        return Ok(Err(SitebookError::rejected(
            "projects",
            id,
            format!("duplicate name '{}'", p.name),
        )));
    }
    Ok(Ok(p))
}

/// Writes every valid row in one SQLite transaction. Rejections are counted,
/// not fatal.
pub fn apply_snapshot(conn: &mut Connection, snapshot: &RemoteSnapshot) -> Result<SyncReport> {
    let tx = conn.transaction()?;
    let mut report = SyncReport::default();

    for r in &snapshot.projects {
        let row = match to_new_project(r) {
            Ok(p) => unclaimed_name(&tx, p)?,
            Err(e) => Err(e),
        };
        match row {
            Ok(p) => {
                store::upsert_project(&tx, &p)?;
                report.projects += 1;
            }
            Err(e) => {
                warn!(error = %e, "skipping remote project");
                report.rejected += 1;
            }
        }
    }

    for r in &snapshot.tasks {
        let row = local_project(&tx, "tasks", &r.id, &r.project_id)?
            .and_then(|project_id| to_new_task(r, project_id));
        match row {
            Ok(t) => {
                store::insert_task(&tx, &t)?;
                report.tasks += 1;
            }
            Err(e) => {
                warn!(error = %e, "skipping remote task");
                report.rejected += 1;
            }
        }
    }

    for r in &snapshot.transactions {
        let row = local_project(&tx, "transactions", &r.id, &r.project_id)?
            .and_then(|project_id| to_new_transaction(r, project_id));
        match row {
            Ok(t) => {
                store::insert_transaction(&tx, &t)?;
                report.transactions += 1;
            }
            Err(e) => {
                warn!(error = %e, "skipping remote transaction");
                report.rejected += 1;
            }
        }
    }

    tx.commit()?;
    info!(?report, "sync applied");
    Ok(report)
}
