// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Backing record stores. Every backend degrades to an empty result or
//! `false` on failure; nothing here returns an error to the caller.

pub mod rest;
pub mod sqlite;

use crate::models::{BillPatch, NewBill, RawBill, SaveRequest};
use crate::period::Period;
use std::collections::BTreeSet;

const RESERVED_INSTANCES: [&str; 2] = ["legado", "legacy"];
const RESERVED_ACCOUNT: &str = "solar";

pub trait BillStore {
    /// All rows stored under exactly this period; empty on any error.
    fn fetch_period(&self, period: Period) -> Vec<RawBill>;
    fn insert(&self, bill: &NewBill) -> bool;
    fn update(&self, id: i64, patch: &BillPatch) -> bool;
    fn delete(&self, id: i64) -> bool;
    /// Distinct account names, reserved rows excluded, ascending.
    fn distinct_account_names(&self) -> Vec<String>;
    /// Earliest year on record through the current year, ascending.
    fn available_years(&self) -> Vec<i32>;

    fn save(&self, req: &SaveRequest) -> bool {
        match req {
            SaveRequest::Create(bill) => self.insert(bill),
            SaveRequest::Update(id, patch) => self.update(*id, patch),
        }
    }
}

/// Applies the reserved-row exclusions to `(account_name, instance)` pairs and
/// returns the trimmed, deduplicated names in ascending order.
pub fn account_names<I>(rows: I) -> Vec<String>
where
    I: IntoIterator<Item = (Option<String>, Option<String>)>,
{
    let mut names = BTreeSet::new();
    for (name, instance) in rows {
        let Some(name) = name else { continue };
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case(RESERVED_ACCOUNT) {
            continue;
        }
        let instance = instance.unwrap_or_default();
        let instance = instance.trim();
        if RESERVED_INSTANCES
            .iter()
            .any(|r| instance.eq_ignore_ascii_case(r))
        {
            continue;
        }
        names.insert(name.to_string());
    }
    names.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_rows_are_skipped() {
        let rows = vec![
            (Some("Water ".to_string()), Some("Unit 1".to_string())),
            (Some("Water".to_string()), None),
            (Some("Solar".to_string()), None),
            (Some("Gas".to_string()), Some("Legado".to_string())),
            (None, None),
            (Some("Electricity".to_string()), Some("legacy".to_string())),
            (Some("Condo".to_string()), Some("".to_string())),
        ];
        assert_eq!(account_names(rows), vec!["Condo", "Water"]);
    }
}
