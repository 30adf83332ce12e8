// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billbook::aggregate::{
    OTHERS_LABEL, aggregate_account_series, aggregate_by_category, compare_accounts,
    filter_recurring, group_by_period, payer_totals, pending_vs_previous,
};
use billbook::models::{Bill, Payer};
use billbook::period::Period;
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn bill(name: &str, amount: i64, payer: Payer, month: u32, year: i32) -> Bill {
    Bill {
        id: 0,
        account_name: name.to_string(),
        amount: Decimal::from(amount),
        payment_date: NaiveDate::from_ymd_opt(year, month, 5),
        instance: String::new(),
        payer,
        payer_label: String::new(),
        is_split: false,
        receipt_link: None,
        invoice_link: None,
        period: Period::new(month, year).unwrap(),
    }
}

fn d(v: i64) -> Decimal {
    Decimal::from(v)
}

#[test]
fn long_tail_collapses_into_others() {
    let names = ["A", "B", "C", "D", "E", "F", "G", "H"];
    let totals = [500, 400, 300, 200, 100, 50, 30, 20];
    // Shuffled input order; the result is ordered by total.
    let table: Vec<Bill> = names
        .iter()
        .zip(totals)
        .rev()
        .map(|(n, t)| bill(n, t, Payer::PayerA, 1, 2024))
        .collect();

    let cats = aggregate_by_category(&table);
    assert_eq!(cats.len(), 6);
    let got: Vec<(&str, Decimal)> = cats.iter().map(|c| (c.name.as_str(), c.total)).collect();
    assert_eq!(
        got,
        vec![
            ("A", d(500)),
            ("B", d(400)),
            ("C", d(300)),
            ("D", d(200)),
            ("E", d(100)),
            (OTHERS_LABEL, d(100)),
        ]
    );
}

#[test]
fn six_categories_are_kept_as_is() {
    let table: Vec<Bill> = (1..=6)
        .map(|i| bill(&format!("Acct{i}"), i * 10, Payer::PayerB, 2, 2024))
        .collect();
    let cats = aggregate_by_category(&table);
    assert_eq!(cats.len(), 6);
    assert!(cats.iter().all(|c| c.name != OTHERS_LABEL));
    assert_eq!(cats[0].name, "Acct6");
}

#[test]
fn category_totals_sum_rows_and_keep_tie_order() {
    let table = vec![
        bill("Water", 30, Payer::PayerA, 1, 2024),
        bill("Gas", 50, Payer::PayerA, 1, 2024),
        bill("Water", 20, Payer::PayerB, 2, 2024),
        bill("Rent", 50, Payer::PayerB, 2, 2024),
    ];
    let cats = aggregate_by_category(&table);
    let names: Vec<&str> = cats.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Water", "Gas", "Rent"]);
    assert!(cats.iter().all(|c| c.total == d(50)));
}

#[test]
fn account_series_skips_empty_periods() {
    let table = vec![
        bill("Electricity", 150, Payer::PayerA, 3, 2024),
        bill("Water", 40, Payer::PayerA, 2, 2024),
        bill("Electricity", 120, Payer::PayerB, 1, 2024),
    ];
    let series = aggregate_account_series(&table, Some("Electricity"));
    assert_eq!(series.len(), 2);
    assert_eq!((series[0].year, series[0].month, series[0].total), (2024, 1, d(120)));
    assert_eq!((series[1].year, series[1].month, series[1].total), (2024, 3, d(150)));
}

#[test]
fn account_series_without_name_sums_everything() {
    let table = vec![
        bill("Water", 40, Payer::PayerA, 12, 2023),
        bill("Gas", 10, Payer::PayerA, 12, 2023),
        bill("Water", 35, Payer::PayerA, 1, 2024),
    ];
    let series = aggregate_account_series(&table, None);
    let totals: Vec<Decimal> = series.iter().map(|s| s.total).collect();
    assert_eq!(totals, vec![d(50), d(35)]);
    assert_eq!(series[0].year, 2023);
    assert!(aggregate_account_series(&[], Some("Water")).is_empty());
}

#[test]
fn recurring_accounts_need_more_than_one_row() {
    let table = vec![
        bill("Rent", 1000, Payer::PayerA, 1, 2024),
        bill("Rent", 1000, Payer::PayerA, 2, 2024),
        bill("Water", 40, Payer::PayerA, 1, 2024),
        bill("rent", 5, Payer::PayerA, 1, 2024),
    ];
    let rec = filter_recurring(&table);
    assert_eq!(rec.into_iter().collect::<Vec<_>>(), vec!["Rent".to_string()]);
}

#[test]
fn payer_totals_include_unsplit_bills() {
    let mut shared = bill("Rent", 1000, Payer::PayerA, 1, 2024);
    shared.is_split = true;
    let table = vec![
        shared,
        bill("Gym", 80, Payer::PayerA, 1, 2024),
        bill("Water", 40, Payer::PayerB, 1, 2024),
        bill("Gift", 15, Payer::Other, 1, 2024),
    ];
    let t = payer_totals(&table);
    assert_eq!(t.payer_a, d(1080));
    assert_eq!(t.payer_b, d(40));
    assert_eq!(t.other, d(15));
    assert_eq!(t.total(), d(1135));
}

#[test]
fn grouping_by_period_is_chronological() {
    let table = vec![
        bill("Water", 40, Payer::PayerA, 2, 2024),
        bill("Gas", 10, Payer::PayerA, 11, 2023),
        bill("Rent", 900, Payer::PayerA, 2, 2024),
    ];
    let groups = group_by_period(&table);
    let keys: Vec<String> = groups.keys().map(|p| p.to_string()).collect();
    assert_eq!(keys, vec!["2023-11", "2024-02"]);
    let feb: Vec<&str> = groups[&Period::new(2, 2024).unwrap()]
        .iter()
        .map(|b| b.account_name.as_str())
        .collect();
    assert_eq!(feb, vec!["Water", "Rent"]);
}

#[test]
fn pending_ignores_case_and_whitespace() {
    let previous = vec![
        bill("Electricity", 120, Payer::PayerA, 1, 2024),
        bill(" Water ", 40, Payer::PayerA, 1, 2024),
        bill("Internet", 99, Payer::PayerB, 1, 2024),
        bill("internet", 1, Payer::PayerB, 1, 2024),
    ];
    let current = vec![bill("electricity", 130, Payer::PayerA, 2, 2024)];
    let pending = pending_vs_previous(&current, &previous);
    let names: Vec<&str> = pending.iter().map(|p| p.account_name.as_str()).collect();
    assert_eq!(names, vec![" Water ", "Internet"]);
    assert_eq!(pending[1].last_paid, NaiveDate::from_ymd_opt(2024, 1, 5));
    assert!(pending_vs_previous(&current, &[]).is_empty());
}

#[test]
fn nothing_is_pending_against_an_empty_month() {
    let previous = vec![
        bill("Electricity", 120, Payer::PayerA, 1, 2024),
        bill("Water", 40, Payer::PayerB, 1, 2024),
    ];
    assert!(pending_vs_previous(&[], &previous).is_empty());
}

#[test]
fn comparison_fills_missing_accounts_with_zero() {
    let reference = vec![
        bill("Gas", 60, Payer::PayerA, 1, 2024),
        bill("Gas", 15, Payer::PayerA, 1, 2024),
    ];
    let current = vec![bill("Electricity", 110, Payer::PayerA, 2, 2024)];
    let accounts = vec!["Electricity".to_string(), "Gas".to_string()];
    let cmp = compare_accounts(&current, &reference, &accounts);
    assert_eq!(cmp.len(), 2);
    assert_eq!((cmp[0].reference, cmp[0].current), (d(0), d(110)));
    assert_eq!((cmp[1].reference, cmp[1].current), (d(75), d(0)));
    assert_eq!(cmp[1].change(), d(-75));
}
