// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal_macros::dec;
use serde_json::json;
use sitebook::commands::sync::{self, RemoteSnapshot, SyncReport};
use sitebook::models::{ProjectStatus, TaskPriority, TaskStatus};
use sitebook::{db, store};

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn snapshot() -> RemoteSnapshot {
    RemoteSnapshot {
        projects: serde_json::from_value(json!([
            {
                "id": "p-1", "name": "Harbor Deck", "client": "Acme", "location": "Pier 4",
                "description": null, "budget": 50000, "start_date": "2024-01-01",
                "end_date": null, "due_date": "2024-06-30T00:00:00+00:00",
                "status": "active", "completion": 25
            },
            {
                "id": "p-2", "name": "Broken", "client": "Acme", "location": null,
                "description": null, "budget": 100, "start_date": "2024-01-01",
                "end_date": null, "due_date": null, "status": "paused", "completion": 0
            }
        ]))
        .unwrap(),
        tasks: serde_json::from_value(json!([
            {
                "id": "t-1", "project_id": "p-1", "title": "Survey", "description": null,
                "status": "in-progress", "priority": null, "start_date": null,
                "due_date": "2024-02-01", "completed_at": null,
                "created_at": "2024-01-03T09:15:00Z"
            },
            {
                "id": "t-2", "project_id": "p-2", "title": "Orphan", "description": null,
                "status": "todo", "priority": "low", "start_date": null, "due_date": null,
                "completed_at": null, "created_at": "2024-01-03"
            }
        ]))
        .unwrap(),
        transactions: serde_json::from_value(json!([
            {
                "id": "x-1", "project_id": "p-1", "date": "2024-01-10", "amount": "1200.50",
                "type": "income", "category": "Payment", "description": null
            },
            {
                "id": "x-2", "project_id": "p-1", "date": "2024-01-11", "amount": 0,
                "type": "expense", "category": "Labor", "description": null
            }
        ]))
        .unwrap(),
    }
}

#[test]
fn apply_snapshot_keeps_valid_rows_and_skips_malformed() {
    let mut conn = base_conn();
    let report = sync::apply_snapshot(&mut conn, &snapshot()).unwrap();
    assert_eq!(
        report,
        SyncReport {
            projects: 1,
            tasks: 1,
            transactions: 1,
            rejected: 3,
        }
    );

    let p = store::project_by_name(&conn, "Harbor Deck").unwrap();
    assert_eq!(p.status, ProjectStatus::Active);
    assert_eq!(p.location, "Pier 4");
    assert_eq!(p.due_date.unwrap().to_string(), "2024-06-30");

    let tasks = store::load_tasks(&conn, Some(p.id)).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::InProgress);
    assert_eq!(tasks[0].priority, TaskPriority::Medium);
    assert_eq!(tasks[0].created_at.to_string(), "2024-01-03");

    let txs = store::load_transactions(&conn, Some(p.id)).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].amount, dec!(1200.50));
}

#[test]
fn repeated_sync_updates_in_place() {
    let mut conn = base_conn();
    let mut snap = snapshot();
    sync::apply_snapshot(&mut conn, &snap).unwrap();

    snap.projects[0].completion = Some(80);
    snap.tasks[0].status = "completed".into();
    snap.tasks[0].completed_at = Some("2024-02-01".into());
    sync::apply_snapshot(&mut conn, &snap).unwrap();

    let projects = store::load_projects(&conn).unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].completion, 80);

    let tasks = store::load_tasks(&conn, None).unwrap();
    assert_eq!(tasks.len(), 1);
    assert!(tasks[0].is_complete());
    assert_eq!(store::load_transactions(&conn, None).unwrap().len(), 1);
}

#[test]
fn remote_rows_are_validated_before_insert() {
    let snap = snapshot();
    let err = sync::to_new_project(&snap.projects[1]).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Rejected projects row 'p-2'"), "{}", msg);
    assert!(msg.contains("Unknown project status 'paused'"), "{}", msg);

    let err = sync::to_new_transaction(&snap.transactions[1], 1).unwrap_err();
    assert!(err.to_string().contains("Amount must be positive"));

    let mut bad_date = snap.tasks[0].clone();
    bad_date.created_at = "yesterday".into();
    assert!(sync::to_new_task(&bad_date, 1).is_err());
}

fn remote_project(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id, "name": name, "client": "Acme", "location": null, "description": null,
        "budget": 1000, "start_date": "2024-01-01", "end_date": null, "due_date": null,
        "status": "planning", "completion": 0
    })
}

#[test]
fn duplicate_project_names_are_rejected_per_row() {
    let mut conn = base_conn();
    conn.execute(
        "INSERT INTO projects(name, client, budget, start_date, status)
         VALUES ('Local', 'Birch', '500', '2024-01-01', 'active')",
        [],
    )
    .unwrap();
    let snap = RemoteSnapshot {
        projects: serde_json::from_value(json!([
            remote_project("p-1", "Same"),
            remote_project("p-2", "Same"),
            remote_project("p-3", "Other"),
            remote_project("p-4", "Local"),
        ]))
        .unwrap(),
        ..Default::default()
    };
    let report = sync::apply_snapshot(&mut conn, &snap).unwrap();
    assert_eq!(report.projects, 2);
    assert_eq!(report.rejected, 2);

    let names: Vec<String> = store::load_projects(&conn)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names.len(), 3);
    assert!(names.contains(&"Other".to_string()));
    assert_eq!(store::project_by_name(&conn, "Local").unwrap().client, "Birch");

    // the row that won the name keeps syncing under it
    let report = sync::apply_snapshot(&mut conn, &snap).unwrap();
    assert_eq!(report.projects, 2);
}
