// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use crate::store;
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let project_id = sub
        .get_one::<String>("project")
        .map(|name| store::id_for_project(conn, name))
        .transpose()?;

    let names: HashMap<i64, String> = store::load_projects(conn)?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let rows = store::load_transactions(conn, project_id)?;
    let project_of = |id: i64| names.get(&id).cloned().unwrap_or_default();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "project",
                "date",
                "amount",
                "type",
                "category",
                "description",
            ])?;
            for t in &rows {
                wtr.write_record([
                    project_of(t.project_id),
                    t.date.to_string(),
                    t.amount.to_string(),
                    t.r#type.to_string(),
                    t.category.clone(),
                    t.description.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .iter()
                .map(|t| {
                    json!({
                        "project": project_of(t.project_id),
                        "date": t.date.to_string(),
                        "amount": t.amount.to_string(),
                        "type": t.r#type.as_str(),
                        "category": t.category,
                        "description": t.description,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
