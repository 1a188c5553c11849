// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TransactionType;
use crate::store;
use crate::utils::pretty_table;
use anyhow::{Result, bail};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let kind: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
            conn.execute(
                "INSERT INTO transaction_categories(name, type) VALUES (?1, ?2)",
                params![name, kind],
            )?;
            println!("Added {} category '{}'", kind, name);
        }
        Some(("list", sub)) => {
            let kind = sub
                .get_one::<String>("type")
                .map(|s| s.parse::<TransactionType>())
                .transpose()?;
            let data = store::load_categories(conn, kind)?
                .into_iter()
                .map(|c| vec![c.name, c.r#type.to_string()])
                .collect();
            println!("{}", pretty_table(&["Category", "Type"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let kind: TransactionType = sub.get_one::<String>("type").unwrap().parse()?;
            let n = conn.execute(
                "DELETE FROM transaction_categories WHERE name=?1 AND type=?2",
                params![name, kind],
            )?;
            if n == 0 {
                bail!("No {} category named '{}'", kind, name);
            }
            println!("Removed {} category '{}'", kind, name);
        }
        _ => {}
    }
    Ok(())
}
