// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month-by-month loading of bills from a store into one table.

use crate::error::{BillError, BillResult};
use crate::models::{ALL_ACCOUNTS, Bill, BillTable, PayerNames, RawBill};
use crate::period::Period;
use crate::store::BillStore;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// What to do with an amount that is missing or not a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountPolicy {
    /// Count it as zero and keep going.
    #[default]
    Lenient,
    /// Fail the whole load.
    Strict,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub policy: AmountPolicy,
    pub payers: PayerNames,
}

/// Parses a store amount. Numbers and numeric strings are accepted.
pub fn coerce_amount(v: &Value) -> Option<Decimal> {
    let from_float = |f: f64| Decimal::try_from(f).ok();
    match v {
        Value::Number(n) => n
            .to_string()
            .parse::<Decimal>()
            .ok()
            .or_else(|| n.as_f64().and_then(from_float)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<Decimal>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(from_float))
        }
        _ => None,
    }
}

fn parse_payment_date(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn account_filter(account: Option<&str>) -> Option<&str> {
    account.filter(|a| *a != ALL_ACCOUNTS)
}

/// Turns a stored row into a bill belonging to `period`, whatever month and
/// year the row itself carries.
fn stamp(raw: RawBill, period: Period, opts: &LoadOptions) -> BillResult<Bill> {
    let account_name = raw.account_name.unwrap_or_default();
    let amount = match coerce_amount(&raw.amount) {
        Some(a) => a,
        None => match opts.policy {
            AmountPolicy::Lenient => {
                warn!(
                    account = %account_name,
                    %period,
                    value = %raw.amount,
                    "malformed amount counted as zero"
                );
                Decimal::ZERO
            }
            AmountPolicy::Strict => {
                return Err(BillError::MalformedAmount {
                    account: account_name,
                    period: period.to_string(),
                    value: raw.amount.to_string(),
                });
            }
        },
    };
    let payer_label = raw.payer.as_deref().unwrap_or_default().trim().to_string();
    Ok(Bill {
        id: raw.id.unwrap_or_default(),
        payment_date: parse_payment_date(raw.payment_date.as_deref()),
        instance: raw.instance.unwrap_or_default(),
        payer: opts.payers.resolve(&payer_label),
        payer_label,
        is_split: raw.is_split.unwrap_or(false),
        receipt_link: raw.receipt_link.filter(|s| !s.trim().is_empty()),
        invoice_link: raw.invoice_link.filter(|s| !s.trim().is_empty()),
        account_name,
        amount,
        period,
    })
}

/// Fetches one period, keeping only `account` rows when a filter is given.
pub fn load_period<S: BillStore + ?Sized>(
    store: &S,
    period: Period,
    account: Option<&str>,
    opts: &LoadOptions,
) -> BillResult<BillTable> {
    let account = account_filter(account);
    let rows = store.fetch_period(period);
    debug!(%period, fetched = rows.len(), "loading period");
    rows.into_iter()
        .filter(|r| account.is_none_or(|a| r.account_name.as_deref() == Some(a)))
        .map(|r| stamp(r, period, opts))
        .collect()
}

/// Loads every period from `start` to `end` inclusive (either order) and
/// concatenates the rows, oldest period first.
pub fn load_range<S: BillStore + ?Sized>(
    store: &S,
    start: Period,
    end: Period,
    account: Option<&str>,
    opts: &LoadOptions,
) -> BillResult<BillTable> {
    if end < start {
        debug!(%start, %end, "range given newest first; swapping");
    }
    let mut table = BillTable::new();
    for period in Period::range(start, end) {
        table.extend(load_period(store, period, account, opts)?);
    }
    Ok(table)
}

/// Loads the period `delta_months` months and `delta_years` years away from
/// `period`, e.g. the previous month or the same month last year.
pub fn load_relative<S: BillStore + ?Sized>(
    store: &S,
    period: Period,
    delta_months: i32,
    delta_years: i32,
    opts: &LoadOptions,
) -> BillResult<BillTable> {
    let target = period.shift(delta_months + delta_years * 12);
    load_period(store, target, None, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn amounts_accept_numbers_and_strings() {
        assert_eq!(coerce_amount(&json!(120)), Some(Decimal::new(120, 0)));
        assert_eq!(coerce_amount(&json!("99.90")), Some(Decimal::new(9990, 2)));
        assert_eq!(coerce_amount(&json!(" 12.5 ")), Some(Decimal::new(125, 1)));
        assert_eq!(coerce_amount(&json!("abc")), None);
        assert_eq!(coerce_amount(&Value::Null), None);
        assert_eq!(coerce_amount(&json!(true)), None);
    }

    #[test]
    fn payment_date_tolerates_timestamps() {
        assert_eq!(
            parse_payment_date(Some("2024-02-10T00:00:00")),
            NaiveDate::from_ymd_opt(2024, 2, 10)
        );
        assert_eq!(parse_payment_date(Some("10/02/2024")), None);
        assert_eq!(parse_payment_date(None), None);
    }
}
