// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::db_path;
use crate::utils::{get_currency, get_setting, pretty_table, set_setting};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("currency", sub)) => {
            let ccy = sub.get_one::<String>("currency").unwrap().trim().to_uppercase();
            if ccy.len() != 3 || !ccy.chars().all(|c| c.is_ascii_alphabetic()) {
                bail!("Currency must be a 3-letter code, got '{}'", ccy);
            }
            set_setting(conn, "currency", &ccy)?;
            println!("Display currency set to {}", ccy);
        }
        Some(("remote", sub)) => {
            let url = sub.get_one::<String>("url").unwrap().trim();
            let key = sub.get_one::<String>("key").unwrap().trim();
            set_setting(conn, "remote_url", url)?;
            set_setting(conn, "remote_key", key)?;
            println!("Remote store set to {}", url);
        }
        _ => show(conn)?,
    }
    Ok(())
}

fn show(conn: &Connection) -> Result<()> {
    let remote = get_setting(conn, "remote_url")?.unwrap_or_else(|| "(not set)".into());
    let key = match get_setting(conn, "remote_key")? {
        Some(_) => "(set)".to_string(),
        None => "(not set)".to_string(),
    };
    let rows = vec![
        vec!["database".to_string(), db_path()?.display().to_string()],
        vec!["currency".to_string(), get_currency(conn)?],
        vec!["remote_url".to_string(), remote],
        vec!["remote_key".to_string(), key],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}
