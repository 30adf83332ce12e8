// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{
    AccountComparison, PayerTotals, PendingBill, aggregate_account_series, aggregate_by_category,
    compare_accounts, filter_recurring, group_by_period, payer_totals, pending_vs_previous,
};
use crate::config::AppContext;
use crate::loader::{load_period, load_range, load_relative};
use crate::models::{CategoryTotal, SeriesPoint};
use crate::period::Period;
use crate::reconcile::{BalanceResult, Settlement, reconcile};
use crate::utils::{
    fmt_money, maybe_print_json, parse_decimal, parse_period, period_or_today, pretty_table,
    range_args,
};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => month(ctx, sub)?,
        Some(("range", sub)) => range(ctx, sub)?,
        Some(("account", sub)) => account(ctx, sub)?,
        Some(("balance", sub)) => balance(ctx, sub)?,
        Some(("compare", sub)) => compare(ctx, sub)?,
        Some(("pending", sub)) => pending(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn adjustment(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<Decimal> {
    match sub.get_one::<String>("adjustment") {
        Some(a) => parse_decimal(a),
        None => Ok(ctx.config.adjustment),
    }
}

fn settlement_line(ctx: &AppContext, b: &BalanceResult) -> String {
    let names = &ctx.config.payers;
    match b.settlement() {
        Settlement::BOwesA(x) => format!("{} owes {} {}", names.b, names.a, fmt_money(&x)),
        Settlement::AOwesB(x) => format!("{} owes {} {}", names.a, names.b, fmt_money(&x)),
        Settlement::Even => "Nothing owed".to_string(),
    }
}

fn balance_rows(ctx: &AppContext, b: &BalanceResult) -> Vec<Vec<String>> {
    let names = &ctx.config.payers;
    vec![
        vec![format!("Split paid by {}", names.a), fmt_money(&b.paid_by_a)],
        vec![format!("Split paid by {}", names.b), fmt_money(&b.paid_by_b)],
        vec!["Split paid by others".into(), fmt_money(&b.paid_by_other)],
        vec!["Total split".into(), fmt_money(&b.total_split)],
        vec!["Half share".into(), fmt_money(&b.half_share)],
        vec!["Balance".into(), fmt_money(&b.raw_balance)],
        vec!["Adjustment".into(), fmt_money(&b.adjustment)],
        vec!["Adjusted balance".into(), fmt_money(&b.adjusted_balance)],
    ]
}

fn category_rows(categories: &[CategoryTotal]) -> Vec<Vec<String>> {
    let total: Decimal = categories.iter().map(|c| c.total).sum();
    categories
        .iter()
        .map(|c| {
            let share = if total.is_zero() {
                Decimal::ZERO
            } else {
                c.total / total * Decimal::ONE_HUNDRED
            };
            vec![c.name.clone(), fmt_money(&c.total), format!("{:.1}%", share)]
        })
        .collect()
}

fn series_rows(points: &[SeriesPoint]) -> Vec<Vec<String>> {
    points
        .iter()
        .map(|p| vec![format!("{:04}-{:02}", p.year, p.month), fmt_money(&p.total)])
        .collect()
}

#[derive(Debug, Serialize)]
pub struct MonthReport {
    pub period: Period,
    pub bill_count: usize,
    pub total: Decimal,
    pub payers: PayerTotals,
    pub categories: Vec<CategoryTotal>,
    pub balance: BalanceResult,
    pub pending: Vec<PendingBill>,
}

pub fn month_report(ctx: &AppContext, period: Period, adjustment: Decimal) -> Result<MonthReport> {
    let opts = ctx.config.load_options();
    let bills = load_period(&*ctx.store, period, None, &opts)?;
    let previous = load_relative(&*ctx.store, period, -1, 0, &opts)?;
    let payers = payer_totals(&bills);
    Ok(MonthReport {
        period,
        bill_count: bills.len(),
        total: payers.total(),
        categories: aggregate_by_category(&bills),
        balance: reconcile(&bills, adjustment),
        pending: pending_vs_previous(&bills, &previous),
        payers,
    })
}

fn month(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let period = period_or_today(sub)?;
    let report = month_report(ctx, period, adjustment(ctx, sub)?)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    if report.bill_count == 0 {
        println!("No bills for {}.", period);
        return Ok(());
    }
    let names = &ctx.config.payers;
    println!("{} - {} bills, total {}", period, report.bill_count, fmt_money(&report.total));
    println!(
        "{}",
        pretty_table(
            &["Payer", "Paid"],
            vec![
                vec![names.a.clone(), fmt_money(&report.payers.payer_a)],
                vec![names.b.clone(), fmt_money(&report.payers.payer_b)],
                vec!["Other".into(), fmt_money(&report.payers.other)],
            ],
        )
    );
    println!(
        "{}",
        pretty_table(&["Account", "Total", "Share"], category_rows(&report.categories))
    );
    println!(
        "{}",
        pretty_table(&["Split balance", "Amount"], balance_rows(ctx, &report.balance))
    );
    println!("{}", settlement_line(ctx, &report.balance));
    if !report.pending.is_empty() {
        println!("Paid last month, not yet this month:");
        for p in &report.pending {
            match p.last_paid {
                Some(d) => println!("  - {} (paid {} last month)", p.account_name, d.format("%d/%m")),
                None => println!("  - {}", p.account_name),
            }
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct AccountSeries {
    pub account_name: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Serialize)]
pub struct PeriodListing {
    pub period: Period,
    pub total: Decimal,
    pub bills: Vec<crate::models::Bill>,
}

/// One table row per bill, as printed under each period of a range report.
pub fn listing_rows(listing: &PeriodListing) -> Vec<Vec<String>> {
    listing
        .bills
        .iter()
        .map(|b| {
            vec![
                b.payment_date.map(|d| d.format("%d/%m").to_string()).unwrap_or_default(),
                b.account_name.clone(),
                b.instance.clone(),
                b.payer_label.clone(),
                fmt_money(&b.amount),
                if b.is_split { "yes" } else { "" }.to_string(),
                b.receipt_link.clone().unwrap_or_default(),
                b.invoice_link.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct RangeReport {
    pub from: Period,
    pub to: Period,
    pub total: Decimal,
    pub categories: Vec<CategoryTotal>,
    pub per_period: Vec<SeriesPoint>,
    /// Trend series for accounts seen on more than one bill.
    pub recurring: Vec<AccountSeries>,
    pub listing: Vec<PeriodListing>,
}

pub fn range_report(
    ctx: &AppContext,
    from: Period,
    to: Period,
    account: Option<&str>,
) -> Result<RangeReport> {
    let (from, to) = if to < from { (to, from) } else { (from, to) };
    let bills = load_range(&*ctx.store, from, to, account, &ctx.config.load_options())?;
    let recurring = filter_recurring(&bills)
        .into_iter()
        .map(|name| AccountSeries {
            points: aggregate_account_series(&bills, Some(name.as_str())),
            account_name: name,
        })
        .collect();
    let listing = group_by_period(&bills)
        .into_iter()
        .map(|(period, bills)| PeriodListing {
            period,
            total: bills.iter().map(|b| b.amount).sum(),
            bills,
        })
        .collect();
    Ok(RangeReport {
        from,
        to,
        total: bills.iter().map(|b| b.amount).sum(),
        categories: aggregate_by_category(&bills),
        per_period: aggregate_account_series(&bills, None),
        recurring,
        listing,
    })
}

fn range(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let (from, to) = range_args(sub)?;
    let account = sub.get_one::<String>("account").map(|s| s.as_str());
    let report = range_report(ctx, from, to, account)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    if report.per_period.is_empty() {
        println!("No bills between {} and {}.", report.from, report.to);
        return Ok(());
    }
    println!(
        "{} to {} - total {}",
        report.from,
        report.to,
        fmt_money(&report.total)
    );
    println!(
        "{}",
        pretty_table(&["Account", "Total", "Share"], category_rows(&report.categories))
    );
    println!(
        "{}",
        pretty_table(&["Period", "Total"], series_rows(&report.per_period))
    );
    for s in &report.recurring {
        println!(
            "{}",
            pretty_table(&["Period", &s.account_name], series_rows(&s.points))
        );
    }
    for l in &report.listing {
        println!("{} - total {}", l.period, fmt_money(&l.total));
        println!(
            "{}",
            pretty_table(
                &["Paid", "Account", "Instance", "Payer", "Amount", "Split", "Receipt", "Invoice"],
                listing_rows(l),
            )
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct AccountReport {
    pub account_name: String,
    pub from: Period,
    pub to: Period,
    pub points: Vec<SeriesPoint>,
    pub total: Decimal,
    pub average: Decimal,
}

pub fn account_report(ctx: &AppContext, from: Period, to: Period, name: &str) -> Result<AccountReport> {
    let (from, to) = if to < from { (to, from) } else { (from, to) };
    let bills = load_range(&*ctx.store, from, to, Some(name), &ctx.config.load_options())?;
    let points = aggregate_account_series(&bills, Some(name));
    let total: Decimal = points.iter().map(|p| p.total).sum();
    let average = if points.is_empty() {
        Decimal::ZERO
    } else {
        total / Decimal::from(points.len())
    };
    Ok(AccountReport {
        account_name: name.to_string(),
        from,
        to,
        points,
        total,
        average,
    })
}

fn account(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let (from, to) = range_args(sub)?;
    let name = sub
        .get_one::<String>("account")
        .map(|s| s.as_str())
        .unwrap_or_default();
    let report = account_report(ctx, from, to, name)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    if report.points.is_empty() {
        println!("No '{}' bills between {} and {}.", name, report.from, report.to);
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(&["Period", &report.account_name], series_rows(&report.points))
    );
    println!(
        "Accumulated {} over {} periods, average {}",
        fmt_money(&report.total),
        report.points.len(),
        fmt_money(&report.average)
    );
    Ok(())
}

/// Split balance over one period or an inclusive range.
pub fn balance_for(
    ctx: &AppContext,
    from: Period,
    to: Period,
    adjustment: Decimal,
) -> Result<BalanceResult> {
    let bills = load_range(&*ctx.store, from, to, None, &ctx.config.load_options())?;
    Ok(reconcile(&bills, adjustment))
}

fn balance(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let (from, to) = match (sub.get_one::<String>("from"), sub.get_one::<String>("to")) {
        (Some(f), Some(t)) => (parse_period(f)?, parse_period(t)?),
        _ => {
            let p = period_or_today(sub)?;
            (p, p)
        }
    };
    let result = balance_for(ctx, from, to, adjustment(ctx, sub)?)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &result)? {
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(&["Split balance", "Amount"], balance_rows(ctx, &result))
    );
    println!("{}", settlement_line(ctx, &result));
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CompareReport {
    pub period: Period,
    pub previous_month: Vec<AccountComparison>,
    pub previous_year: Vec<AccountComparison>,
}

pub fn compare_report(ctx: &AppContext, period: Period) -> Result<CompareReport> {
    let opts = ctx.config.load_options();
    let current = load_period(&*ctx.store, period, None, &opts)?;
    let last_month = load_relative(&*ctx.store, period, -1, 0, &opts)?;
    let last_year = load_relative(&*ctx.store, period, 0, -1, &opts)?;
    let accounts = &ctx.config.comparison_accounts;
    Ok(CompareReport {
        period,
        previous_month: compare_accounts(&current, &last_month, accounts),
        previous_year: compare_accounts(&current, &last_year, accounts),
    })
}

fn compare(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let period = period_or_today(sub)?;
    let report = compare_report(ctx, period)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    let prev = period.shift(-1).to_string();
    let last_year = period.shift(-12).to_string();
    let cur = period.to_string();
    println!(
        "{}",
        pretty_table(&["Account", &prev, &cur, "Change"], comparison_rows(&report.previous_month))
    );
    println!(
        "{}",
        pretty_table(&["Account", &last_year, &cur, "Change"], comparison_rows(&report.previous_year))
    );
    Ok(())
}

fn comparison_rows(items: &[AccountComparison]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|c| {
            vec![
                c.account_name.clone(),
                fmt_money(&c.reference),
                fmt_money(&c.current),
                fmt_money(&c.change()),
            ]
        })
        .collect()
}

pub fn pending_report(ctx: &AppContext, period: Period) -> Result<Vec<PendingBill>> {
    let opts = ctx.config.load_options();
    let current = load_period(&*ctx.store, period, None, &opts)?;
    let previous = load_relative(&*ctx.store, period, -1, 0, &opts)?;
    Ok(pending_vs_previous(&current, &previous))
}

fn pending(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let period = period_or_today(sub)?;
    let items = pending_report(ctx, period)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        return Ok(());
    }
    if items.is_empty() {
        println!("Nothing pending for {}.", period);
        return Ok(());
    }
    let rows = items
        .into_iter()
        .map(|p| {
            vec![
                p.account_name,
                p.last_paid.map(|d| d.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Account", "Paid last month on"], rows));
    Ok(())
}
