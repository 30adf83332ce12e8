// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Totals over a loaded bill table. Everything here is pure.

use crate::models::{Bill, CategoryTotal, Payer, SeriesPoint};
use crate::period::Period;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

pub const OTHERS_LABEL: &str = "Others";
const MAX_CATEGORIES: usize = 6;
const TOP_CATEGORIES: usize = 5;

/// Sum per period for one account (or every account when `account` is
/// `None`), oldest first. Periods without matching rows are left out.
pub fn aggregate_account_series(table: &[Bill], account: Option<&str>) -> Vec<SeriesPoint> {
    let mut by_period: BTreeMap<Period, Decimal> = BTreeMap::new();
    for bill in table
        .iter()
        .filter(|b| account.is_none_or(|a| b.account_name == a))
    {
        *by_period.entry(bill.period).or_insert(Decimal::ZERO) += bill.amount;
    }
    by_period
        .into_iter()
        .map(|(p, total)| SeriesPoint {
            year: p.year,
            month: p.month,
            total,
        })
        .collect()
}

/// Totals per account name, largest first. With more than six names the
/// five largest are kept and the rest are summed into "Others".
///
/// Names are grouped in order of first appearance and the sort is stable, so
/// equal totals keep that order.
pub fn aggregate_by_category(table: &[Bill]) -> Vec<CategoryTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for bill in table {
        let i = *index.entry(bill.account_name.as_str()).or_insert_with(|| {
            totals.push(CategoryTotal {
                name: bill.account_name.clone(),
                total: Decimal::ZERO,
            });
            totals.len() - 1
        });
        totals[i].total += bill.amount;
    }
    totals.sort_by(|a, b| b.total.cmp(&a.total));

    if totals.len() > MAX_CATEGORIES {
        let rest: Decimal = totals[TOP_CATEGORIES..].iter().map(|c| c.total).sum();
        totals.truncate(TOP_CATEGORIES);
        totals.push(CategoryTotal {
            name: OTHERS_LABEL.to_string(),
            total: rest,
        });
    }
    totals
}

/// Account names that occur on more than one row.
pub fn filter_recurring(table: &[Bill]) -> BTreeSet<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for bill in table {
        *counts.entry(bill.account_name.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PayerTotals {
    pub payer_a: Decimal,
    pub payer_b: Decimal,
    pub other: Decimal,
}

impl PayerTotals {
    pub fn total(&self) -> Decimal {
        self.payer_a + self.payer_b + self.other
    }
}

/// Everything each payer paid, split or not.
pub fn payer_totals(table: &[Bill]) -> PayerTotals {
    let mut t = PayerTotals::default();
    for bill in table {
        match bill.payer {
            Payer::PayerA => t.payer_a += bill.amount,
            Payer::PayerB => t.payer_b += bill.amount,
            Payer::Other => t.other += bill.amount,
        }
    }
    t
}

/// Bills bucketed by period, each bucket in table order.
pub fn group_by_period(table: &[Bill]) -> BTreeMap<Period, Vec<Bill>> {
    let mut out: BTreeMap<Period, Vec<Bill>> = BTreeMap::new();
    for bill in table {
        out.entry(bill.period).or_default().push(bill.clone());
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingBill {
    pub account_name: String,
    pub last_paid: Option<NaiveDate>,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Accounts paid in `previous` with no bill in `current` yet. Names match
/// ignoring case and surrounding whitespace. A month with no bills at all
/// has not been started, so nothing is pending against it.
pub fn pending_vs_previous(current: &[Bill], previous: &[Bill]) -> Vec<PendingBill> {
    if current.is_empty() {
        return Vec::new();
    }
    let paid: HashSet<String> = current.iter().map(|b| normalize(&b.account_name)).collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for bill in previous {
        let key = normalize(&bill.account_name);
        if key.is_empty() || paid.contains(&key) || !seen.insert(key) {
            continue;
        }
        out.push(PendingBill {
            account_name: bill.account_name.clone(),
            last_paid: bill.payment_date,
        });
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountComparison {
    pub account_name: String,
    pub reference: Decimal,
    pub current: Decimal,
}

impl AccountComparison {
    pub fn change(&self) -> Decimal {
        self.current - self.reference
    }
}

/// Per-account totals of `reference` against `current`, in the order the
/// accounts are given. Accounts absent from a table count as zero.
pub fn compare_accounts(
    current: &[Bill],
    reference: &[Bill],
    accounts: &[String],
) -> Vec<AccountComparison> {
    let sum_for = |table: &[Bill], name: &str| -> Decimal {
        table
            .iter()
            .filter(|b| b.account_name == name)
            .map(|b| b.amount)
            .sum()
    };
    accounts
        .iter()
        .map(|name| AccountComparison {
            account_name: name.clone(),
            reference: sum_for(reference, name),
            current: sum_for(current, name),
        })
        .collect()
}
