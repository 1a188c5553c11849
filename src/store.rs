// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Row-store access: typed loaders and inserts over the SQLite tables.
//! Rows leave this module fully parsed, so the aggregation core never sees
//! raw text.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::SitebookError;
use crate::models::{
    Project, ProjectStatus, Task, TaskPriority, TaskStatus, Transaction, TransactionCategory,
    TransactionType,
};

const PROJECT_COLUMNS: &str = "id, name, client, location, description, budget, start_date, \
     end_date, due_date, status, completion";
const TASK_COLUMNS: &str = "id, project_id, title, description, status, priority, start_date, \
     due_date, completed_at, created_at";
const TRANSACTION_COLUMNS: &str = "id, project_id, date, amount, type, category, description";

#[derive(Debug, Clone)]
pub struct NewProject {
    pub remote_id: Option<String>,
    pub name: String,
    pub client: String,
    pub location: String,
    pub description: String,
    pub budget: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub completion: i64,
}

impl NewProject {
    pub fn validate(&self) -> Result<(), SitebookError> {
        if self.budget <= Decimal::ZERO {
            return Err(SitebookError::NonPositiveAmount(self.budget));
        }
        check_completion(self.completion)
    }
}

impl From<&Project> for NewProject {
    fn from(p: &Project) -> Self {
        NewProject {
            remote_id: None,
            name: p.name.clone(),
            client: p.client.clone(),
            location: p.location.clone(),
            description: p.description.clone(),
            budget: p.budget,
            start_date: p.start_date,
            end_date: p.end_date,
            due_date: p.due_date,
            status: p.status,
            completion: i64::from(p.completion),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub remote_id: Option<String>,
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub completed_at: Option<NaiveDate>,
    pub created_at: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub remote_id: Option<String>,
    pub project_id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub category: String,
    pub description: String,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<(), SitebookError> {
        if self.amount <= Decimal::ZERO {
            return Err(SitebookError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }
}

pub fn check_completion(completion: i64) -> Result<(), SitebookError> {
    if (0..=100).contains(&completion) {
        Ok(())
    } else {
        Err(SitebookError::CompletionOutOfRange(completion))
    }
}

fn decimal_at(r: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = r.get(idx)?;
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn project_from_row(r: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: r.get(0)?,
        name: r.get(1)?,
        client: r.get(2)?,
        location: r.get(3)?,
        description: r.get(4)?,
        budget: decimal_at(r, 5)?,
        start_date: r.get(6)?,
        end_date: r.get(7)?,
        due_date: r.get(8)?,
        status: r.get(9)?,
        completion: r.get(10)?,
    })
}

fn task_from_row(r: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: r.get(0)?,
        project_id: r.get(1)?,
        title: r.get(2)?,
        description: r.get(3)?,
        status: r.get(4)?,
        priority: r.get(5)?,
        start_date: r.get(6)?,
        due_date: r.get(7)?,
        completed_at: r.get(8)?,
        created_at: r.get(9)?,
    })
}

fn transaction_from_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        project_id: r.get(1)?,
        date: r.get(2)?,
        amount: decimal_at(r, 3)?,
        r#type: r.get(4)?,
        category: r.get(5)?,
        description: r.get(6)?,
    })
}

pub fn load_projects(conn: &Connection) -> Result<Vec<Project>> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY start_date, id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], project_from_row)?;
    let projects = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    debug!(count = projects.len(), "loaded projects");
    Ok(projects)
}

pub fn project_by_name(conn: &Connection, name: &str) -> Result<Project> {
    let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE name=?1");
    conn.query_row(&sql, params![name], project_from_row)
        .optional()?
        .ok_or_else(|| SitebookError::ProjectNotFound(name.to_string()).into())
}

pub fn id_for_project(conn: &Connection, name: &str) -> Result<i64> {
    let id: Option<i64> = conn
        .query_row("SELECT id FROM projects WHERE name=?1", params![name], |r| r.get(0))
        .optional()?;
    id.ok_or_else(|| SitebookError::ProjectNotFound(name.to_string()).into())
}

/// True when `name` already belongs to a project other than the one synced
/// as `remote_id`.
pub fn project_name_taken(conn: &Connection, name: &str, remote_id: Option<&str>) -> Result<bool> {
    let hit: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM projects WHERE name=?1 AND (remote_id IS NULL OR ?2 IS NULL OR remote_id<>?2)",
            params![name, remote_id],
            |r| r.get(0),
        )
        .optional()?;
    Ok(hit.is_some())
}

pub fn project_id_for_remote(conn: &Connection, remote_id: &str) -> Result<Option<i64>> {
    Ok(conn
        .query_row(
            "SELECT id FROM projects WHERE remote_id=?1",
            params![remote_id],
            |r| r.get(0),
        )
        .optional()?)
}

/// Transactions oldest first, optionally for one project.
pub fn load_transactions(conn: &Connection, project_id: Option<i64>) -> Result<Vec<Transaction>> {
    let sql = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions \
         WHERE ?1 IS NULL OR project_id=?1 ORDER BY date, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![project_id], transaction_from_row)?;
    let txs = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    debug!(count = txs.len(), ?project_id, "loaded transactions");
    Ok(txs)
}

/// Tasks newest first, optionally for one project.
pub fn load_tasks(conn: &Connection, project_id: Option<i64>) -> Result<Vec<Task>> {
    let sql = format!(
        "SELECT {TASK_COLUMNS} FROM tasks \
         WHERE ?1 IS NULL OR project_id=?1 ORDER BY created_at DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![project_id], task_from_row)?;
    let tasks = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    debug!(count = tasks.len(), ?project_id, "loaded tasks");
    Ok(tasks)
}

pub fn load_task(conn: &Connection, id: i64) -> Result<Task> {
    let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id=?1");
    conn.query_row(&sql, params![id], task_from_row)
        .with_context(|| format!("Task #{} not found", id))
}

pub fn load_categories(
    conn: &Connection,
    kind: Option<TransactionType>,
) -> Result<Vec<TransactionCategory>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type FROM transaction_categories \
         WHERE ?1 IS NULL OR type=?1 ORDER BY name",
    )?;
    let rows = stmt.query_map(params![kind], |r| {
        Ok(TransactionCategory {
            id: r.get(0)?,
            name: r.get(1)?,
            r#type: r.get(2)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn category_known(conn: &Connection, name: &str, kind: TransactionType) -> Result<bool> {
    let hit: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM transaction_categories WHERE name=?1 AND type=?2",
            params![name, kind],
            |r| r.get(0),
        )
        .optional()?;
    Ok(hit.is_some())
}

pub fn insert_project(conn: &Connection, p: &NewProject) -> Result<i64> {
    p.validate()?;
    conn.execute(
        "INSERT INTO projects(remote_id, name, client, location, description, budget, start_date, end_date, due_date, status, completion)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            p.remote_id,
            p.name,
            p.client,
            p.location,
            p.description,
            p.budget.to_string(),
            p.start_date,
            p.end_date,
            p.due_date,
            p.status,
            p.completion
        ],
    )
    .with_context(|| format!("Insert project '{}'", p.name))?;
    Ok(conn.last_insert_rowid())
}

/// Inserts or refreshes a project keyed by its hosted-store id.
pub fn upsert_project(conn: &Connection, p: &NewProject) -> Result<i64> {
    p.validate()?;
    let remote_id = p
        .remote_id
        .as_deref()
        .context("upsert requires a remote id")?;
    conn.execute(
        "INSERT INTO projects(remote_id, name, client, location, description, budget, start_date, end_date, due_date, status, completion)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT(remote_id) DO UPDATE SET
            name=excluded.name, client=excluded.client, location=excluded.location,
            description=excluded.description, budget=excluded.budget,
            start_date=excluded.start_date, end_date=excluded.end_date,
            due_date=excluded.due_date, status=excluded.status, completion=excluded.completion",
        params![
            remote_id,
            p.name,
            p.client,
            p.location,
            p.description,
            p.budget.to_string(),
            p.start_date,
            p.end_date,
            p.due_date,
            p.status,
            p.completion
        ],
    )
    .with_context(|| format!("Upsert project '{}'", p.name))?;
    let id = project_id_for_remote(conn, remote_id)?
        .with_context(|| format!("Project {} vanished after upsert", remote_id))?;
    Ok(id)
}

pub fn insert_task(conn: &Connection, t: &NewTask) -> Result<i64> {
    conn.execute(
        "INSERT INTO tasks(remote_id, project_id, title, description, status, priority, start_date, due_date, completed_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(remote_id) DO UPDATE SET
            project_id=excluded.project_id, title=excluded.title,
            description=excluded.description, status=excluded.status,
            priority=excluded.priority, start_date=excluded.start_date,
            due_date=excluded.due_date, completed_at=excluded.completed_at",
        params![
            t.remote_id,
            t.project_id,
            t.title,
            t.description,
            t.status,
            t.priority,
            t.start_date,
            t.due_date,
            t.completed_at,
            t.created_at
        ],
    )
    .with_context(|| format!("Insert task '{}'", t.title))?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_transaction(conn: &Connection, t: &NewTransaction) -> Result<i64> {
    t.validate()?;
    conn.execute(
        "INSERT INTO transactions(remote_id, project_id, date, amount, type, category, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(remote_id) DO UPDATE SET
            project_id=excluded.project_id, date=excluded.date, amount=excluded.amount,
            type=excluded.type, category=excluded.category, description=excluded.description",
        params![
            t.remote_id,
            t.project_id,
            t.date,
            t.amount.to_string(),
            t.r#type,
            t.category,
            t.description
        ],
    )
    .with_context(|| format!("Insert transaction on {}", t.date))?;
    Ok(conn.last_insert_rowid())
}
