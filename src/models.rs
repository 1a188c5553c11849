// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SitebookError;

/// Closed string vocabularies shared by the row store, the CLI and the sync
/// layer. Each variant round-trips through its lowercase wire name.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = SitebookError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(SitebookError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                        expected: [$($wire),+].join("|"),
                    }),
                }
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: SitebookError| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

string_enum!(
    ProjectStatus, "project status" {
        Planning => "planning",
        Active => "active",
        OnHold => "on-hold",
        Completed => "completed",
    }
);

string_enum!(
    TaskStatus, "task status" {
        Todo => "todo",
        InProgress => "in-progress",
        Completed => "completed",
        Blocked => "blocked",
        Review => "review",
    }
);

string_enum!(
    TaskPriority, "task priority" {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
);

string_enum!(
    /// Direction of a transaction. Amounts are stored positive; the sign
    /// lives here.
    TransactionType, "transaction type" {
        Income => "income",
        Expense => "expense",
    }
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub client: String,
    pub location: String,
    pub description: String,
    pub budget: Decimal,
    pub start_date: NaiveDate,
    /// Set only when the project is completed.
    pub end_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub completion: u8, // 0-100
}

impl Project {
    pub fn is_complete(&self) -> bool {
        self.status == ProjectStatus::Completed || self.completion >= 100
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
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

impl Task {
    pub fn is_complete(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub project_id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub category: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionCategory {
    pub id: i64,
    pub name: String,
    pub r#type: TransactionType,
}
