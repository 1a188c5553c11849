// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use crate::financials::{self, Timeframe, TypeView};
use crate::models::TransactionType;
use crate::store::{self, NewTransaction};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, resolve_today};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use tracing::warn;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let project = sub.get_one::<String>("project").unwrap();
    let kind: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();

    if !store::category_known(conn, &category, kind)? {
        warn!(%category, %kind, "category is not in the vocabulary");
    }

    let tx = NewTransaction {
        remote_id: None,
        project_id: store::id_for_project(conn, project)?,
        date: parse_date(sub.get_one::<String>("date").unwrap())?,
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        r#type: kind,
        category,
        description: sub
            .get_one::<String>("description")
            .cloned()
            .unwrap_or_default(),
    };
    store::insert_transaction(conn, &tx)?;
    println!(
        "Recorded {} {} on {} ({}) for '{}'",
        tx.r#type, tx.amount, tx.date, tx.category, project
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.project.clone(),
                    r.r#type.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Project", "Type", "Amount", "Category", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub date: String,
    pub project: String,
    pub r#type: String,
    pub amount: String,
    pub category: String,
    pub description: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let project_id = sub
        .get_one::<String>("project")
        .map(|name| store::id_for_project(conn, name))
        .transpose()?;
    let timeframe: Timeframe = sub.get_one::<String>("timeframe").unwrap().parse()?;
    let view: TypeView = sub.get_one::<String>("view").unwrap().parse()?;
    let today = resolve_today(sub)?;

    let names: HashMap<i64, String> = store::load_projects(conn)?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();
    let all = store::load_transactions(conn, project_id)?;
    let mut filtered = financials::filter_transactions(&all, timeframe, view, today);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        filtered.truncate(*limit);
    }

    Ok(filtered
        .into_iter()
        .map(|t| TransactionRow {
            date: t.date.to_string(),
            project: names.get(&t.project_id).cloned().unwrap_or_default(),
            r#type: t.r#type.to_string(),
            amount: t.amount.to_string(),
            category: t.category,
            description: t.description,
        })
        .collect())
}
