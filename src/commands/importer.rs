// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TransactionType;
use crate::store::{self, NewTransaction};
use crate::utils::{parse_date, parse_decimal};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::collections::{HashMap, hash_map::Entry};
use tracing::{info, warn};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

/// Reads `project,date,amount,type,category,description` rows. Any bad row
/// aborts the whole import; nothing is written unless every row is valid.
fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut project_cache: HashMap<String, i64> = HashMap::new();
    let mut count = 0usize;

    for (line, result) in rdr.records().enumerate() {
        let rec = result?;
        let row = line + 2; // 1-based, after the header
        let project = rec.get(0).context("project missing")?.trim().to_string();
        let date_raw = rec.get(1).context("date missing")?.trim();
        let amount_raw = rec.get(2).context("amount missing")?.trim();
        let type_raw = rec.get(3).context("type missing")?.trim();
        let category = rec.get(4).unwrap_or("").trim().to_string();
        let description = rec.get(5).unwrap_or("").trim().to_string();

        let date = parse_date(date_raw).with_context(|| format!("Row {}", row))?;
        let amount = parse_decimal(amount_raw).with_context(|| format!("Row {}", row))?;
        let kind: TransactionType = type_raw
            .parse()
            .with_context(|| format!("Row {}", row))?;

        let project_id = match project_cache.entry(project.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = store::id_for_project(&tx, &project)
                    .with_context(|| format!("Row {}", row))?;
                *entry.insert(id)
            }
        };
        if category.is_empty() {
            warn!(row, "importing transaction without a category");
        }

        store::insert_transaction(
            &tx,
            &NewTransaction {
                remote_id: None,
                project_id,
                date,
                amount,
                r#type: kind,
                category,
                description,
            },
        )
        .with_context(|| format!("Row {}", row))?;
        count += 1;
    }
    tx.commit()?;
    info!(count, path, "import finished");
    println!("Imported {} transactions from {}", count, path);
    Ok(())
}
