// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sitebook::financials::{self, Timeframe, TypeView};
use sitebook::models::{Transaction, TransactionType};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn tx(id: i64, date: &str, amount: Decimal, kind: TransactionType, category: &str) -> Transaction {
    Transaction {
        id,
        project_id: 1,
        date: d(date),
        amount,
        r#type: kind,
        category: category.to_string(),
        description: String::new(),
    }
}

#[test]
fn summarize_reports_profit_and_margin() {
    let rows = vec![
        tx(1, "2024-01-05", dec!(1000), TransactionType::Income, "Payment"),
        tx(2, "2024-01-20", dec!(400), TransactionType::Expense, "Materials"),
    ];
    let s = financials::summarize(&rows, dec!(5000));
    assert_eq!(s.total_budget, dec!(5000));
    assert_eq!(s.total_income, dec!(1000));
    assert_eq!(s.total_expenses, dec!(400));
    assert_eq!(s.current_profit, dec!(600));
    assert_eq!(s.profit_margin, dec!(60));
}

#[test]
fn margin_is_zero_without_income() {
    let rows = vec![tx(1, "2024-01-05", dec!(250), TransactionType::Expense, "Labor")];
    let s = financials::summarize(&rows, dec!(1000));
    assert_eq!(s.current_profit, dec!(-250));
    assert_eq!(s.profit_margin, Decimal::ZERO);

    let empty = financials::summarize(&[], dec!(1000));
    assert_eq!(empty.total_income, Decimal::ZERO);
    assert_eq!(empty.profit_margin, Decimal::ZERO);
}

#[test]
fn categories_keep_first_seen_order() {
    let rows = vec![
        tx(1, "2024-01-01", dec!(10), TransactionType::Expense, "Materials"),
        tx(2, "2024-01-02", dec!(5), TransactionType::Expense, "Labor"),
        tx(3, "2024-01-03", dec!(7.5), TransactionType::Expense, "Materials"),
        tx(4, "2024-01-04", dec!(3), TransactionType::Expense, "materials"),
    ];
    let cats = financials::group_by_category(&rows);
    let names: Vec<&str> = cats.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Materials", "Labor", "materials"]);
    assert_eq!(cats[0].value, dec!(17.5));
}

#[test]
fn expense_breakdown_skips_income() {
    let rows = vec![
        tx(1, "2024-01-01", dec!(900), TransactionType::Income, "Payment"),
        tx(2, "2024-01-02", dec!(120), TransactionType::Expense, "Permits"),
    ];
    let cats = financials::expense_breakdown(&rows);
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].name, "Permits");
}

#[test]
fn thirty_day_window_includes_cutoff_day() {
    let today = d("2024-03-31");
    let rows = vec![
        tx(1, "2024-02-29", dec!(1), TransactionType::Income, "A"),
        tx(2, "2024-03-01", dec!(2), TransactionType::Income, "A"),
        tx(3, "2024-03-31", dec!(3), TransactionType::Income, "A"),
    ];
    let kept = financials::filter_by_timeframe(&rows, Timeframe::Last30Days, today);
    let ids: Vec<i64> = kept.iter().map(|t| t.id).collect();
    assert_eq!(ids, [2, 3]);

    let all = financials::filter_by_timeframe(&rows, Timeframe::All, today);
    assert_eq!(all.len(), 3);
}

#[test]
fn combined_filter_sorts_newest_first() {
    let today = d("2024-06-30");
    let rows = vec![
        tx(1, "2024-06-01", dec!(10), TransactionType::Expense, "A"),
        tx(2, "2024-06-20", dec!(20), TransactionType::Income, "B"),
        tx(3, "2024-06-20", dec!(30), TransactionType::Expense, "C"),
        tx(4, "2023-01-01", dec!(40), TransactionType::Expense, "D"),
    ];
    let out = financials::filter_transactions(
        &rows,
        Timeframe::Last90Days,
        TypeView::Only(TransactionType::Expense),
        today,
    );
    let ids: Vec<i64> = out.iter().map(|t| t.id).collect();
    assert_eq!(ids, [3, 1]);
}

#[test]
fn months_are_bucketed_oldest_first() {
    let rows = vec![
        tx(1, "2024-02-10", dec!(500), TransactionType::Income, "Payment"),
        tx(2, "2024-01-15", dec!(200), TransactionType::Expense, "Labor"),
        tx(3, "2024-02-11", dec!(100), TransactionType::Expense, "Labor"),
    ];
    let months = financials::group_by_month(&rows);
    assert_eq!(months.len(), 2);
    assert_eq!(months[0].label, "Jan 2024");
    assert_eq!(months[0].profit, dec!(-200));
    assert_eq!(months[1].label, "Feb 2024");
    assert_eq!(months[1].income, dec!(500));
    assert_eq!(months[1].expense, dec!(100));
    assert_eq!(months[1].profit, dec!(400));
}

fn arb_tx() -> impl Strategy<Value = Transaction> {
    (
        1i64..10_000_000,
        any::<bool>(),
        prop::sample::select(vec!["Materials", "Labor", "Permits", "Payment"]),
        0u32..365,
    )
        .prop_map(|(cents, income, category, offset)| Transaction {
            id: i64::from(offset),
            project_id: 1,
            date: d("2024-01-01") + chrono::Duration::days(i64::from(offset)),
            amount: Decimal::new(cents, 2),
            r#type: if income {
                TransactionType::Income
            } else {
                TransactionType::Expense
            },
            category: category.to_string(),
            description: String::new(),
        })
}

proptest! {
    #[test]
    fn category_totals_sum_to_ledger_total(rows in prop::collection::vec(arb_tx(), 0..40)) {
        let total: Decimal = rows.iter().map(|t| t.amount).sum();
        let grouped: Decimal = financials::group_by_category(&rows).iter().map(|c| c.value).sum();
        prop_assert_eq!(total, grouped);
    }

    #[test]
    fn profit_is_income_minus_expenses(rows in prop::collection::vec(arb_tx(), 0..40)) {
        let s = financials::summarize(&rows, dec!(1));
        prop_assert_eq!(s.current_profit, s.total_income - s.total_expenses);
        let monthly: Decimal = financials::group_by_month(&rows).iter().map(|m| m.profit).sum();
        prop_assert_eq!(monthly, s.current_profit);
    }
}
