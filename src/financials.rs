// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Profit & loss roll-ups over a project's transaction rows.
//!
//! Every function here is pure: it takes already-loaded rows and returns a
//! fresh value. Nothing is cached between calls.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::SitebookError;
use crate::models::{Transaction, TransactionType};

/// Look-back window applied to the ledger before aggregating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    #[default]
    All,
    Last30Days,
    Last90Days,
    Last6Months,
}

impl Timeframe {
    /// First date still inside the window, or `None` for `All`.
    pub fn cutoff(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Timeframe::All => None,
            Timeframe::Last30Days => Some(today - Duration::days(30)),
            Timeframe::Last90Days => Some(today - Duration::days(90)),
            Timeframe::Last6Months => Some(
                today
                    .checked_sub_months(Months::new(6))
                    .unwrap_or(NaiveDate::MIN),
            ),
        }
    }
}

impl FromStr for Timeframe {
    type Err = SitebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Timeframe::All),
            "30days" => Ok(Timeframe::Last30Days),
            "90days" => Ok(Timeframe::Last90Days),
            "6months" => Ok(Timeframe::Last6Months),
            _ => Err(SitebookError::UnknownVariant {
                kind: "timeframe",
                value: s.to_string(),
                expected: "all|30days|90days|6months".into(),
            }),
        }
    }
}

/// Income/expense view filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeView {
    #[default]
    All,
    Only(TransactionType),
}

impl FromStr for TypeView {
    type Err = SitebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeView::All);
        }
        s.parse::<TransactionType>()
            .map(TypeView::Only)
            .map_err(|_| SitebookError::UnknownVariant {
                kind: "view",
                value: s.to_string(),
                expected: "all|income|expense".into(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialsSummary {
    pub total_budget: Decimal,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub current_profit: Decimal,
    /// Percent of income kept as profit. Zero when there is no income.
    pub profit_margin: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub income: Decimal,
    pub expense: Decimal,
    pub profit: Decimal,
}

pub fn filter_by_timeframe(
    transactions: &[Transaction],
    timeframe: Timeframe,
    today: NaiveDate,
) -> Vec<Transaction> {
    match timeframe.cutoff(today) {
        None => transactions.to_vec(),
        Some(cutoff) => transactions
            .iter()
            .filter(|t| t.date >= cutoff)
            .cloned()
            .collect(),
    }
}

pub fn filter_by_type(transactions: &[Transaction], view: TypeView) -> Vec<Transaction> {
    match view {
        TypeView::All => transactions.to_vec(),
        TypeView::Only(kind) => transactions
            .iter()
            .filter(|t| t.r#type == kind)
            .cloned()
            .collect(),
    }
}

/// Applies both filters and orders the result newest first, the way the
/// ledger is listed.
pub fn filter_transactions(
    transactions: &[Transaction],
    timeframe: Timeframe,
    view: TypeView,
    today: NaiveDate,
) -> Vec<Transaction> {
    let windowed = filter_by_timeframe(transactions, timeframe, today);
    let mut out = filter_by_type(&windowed, view);
    out.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    out
}

pub fn summarize(transactions: &[Transaction], budget: Decimal) -> FinancialsSummary {
    let (income, expenses) =
        transactions
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(inc, exp), t| match t.r#type {
                TransactionType::Income => (inc + t.amount, exp),
                TransactionType::Expense => (inc, exp + t.amount),
            });
    let profit = income - expenses;
    let margin = if income > Decimal::ZERO {
        profit / income * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };
    FinancialsSummary {
        total_budget: budget,
        total_income: income,
        total_expenses: expenses,
        current_profit: profit,
        profit_margin: margin,
    }
}

/// Sums amounts per category, keeping the order in which categories first
/// appear. Category names are compared exactly.
pub fn group_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut out: Vec<CategoryTotal> = Vec::new();
    for t in transactions {
        match out.iter_mut().find(|c| c.name == t.category) {
            Some(existing) => existing.value += t.amount,
            None => out.push(CategoryTotal {
                name: t.category.clone(),
                value: t.amount,
            }),
        }
    }
    out
}

/// Category totals over expense rows only.
pub fn expense_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let expenses = filter_by_type(transactions, TypeView::Only(TransactionType::Expense));
    group_by_category(&expenses)
}

/// Buckets by calendar (year, month), oldest first.
pub fn group_by_month(transactions: &[Transaction]) -> Vec<MonthlyTotal> {
    let mut buckets: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();
    for t in transactions {
        let entry = buckets
            .entry((t.date.year(), t.date.month()))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match t.r#type {
            TransactionType::Income => entry.0 += t.amount,
            TransactionType::Expense => entry.1 += t.amount,
        }
    }
    buckets
        .into_iter()
        .map(|((year, month), (income, expense))| MonthlyTotal {
            label: month_label(year, month),
            year,
            month,
            income,
            expense,
            profit: income - expense,
        })
        .collect()
}

pub(crate) fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{:04}-{:02}", year, month))
}
