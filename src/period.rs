// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Accounting periods: one (year, month) bucket per bill.

use crate::error::{BillError, BillResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (year, month) reporting unit. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// Months are 1..=12 and years are limited to what `NaiveDate` can hold.
    pub fn new(month: u32, year: i32) -> BillResult<Self> {
        let years = NaiveDate::MIN.year()..=NaiveDate::MAX.year();
        if !(1..=12).contains(&month) || !years.contains(&year) {
            return Err(BillError::InvalidPeriod { month, year });
        }
        Ok(Self { year, month })
    }

    /// Parses `YYYY-MM`.
    pub fn parse(s: &str) -> BillResult<Self> {
        let s = s.trim();
        let (y, m) = s
            .split_once('-')
            .ok_or_else(|| BillError::InvalidMonth(s.to_string()))?;
        let year: i32 = y.parse().map_err(|_| BillError::InvalidMonth(s.to_string()))?;
        let month: u32 = m.parse().map_err(|_| BillError::InvalidMonth(s.to_string()))?;
        Self::new(month, year)
    }

    pub fn of_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn today() -> Self {
        Self::of_date(chrono::Local::now().date_naive())
    }

    /// The period `months` calendar months away (negative goes back).
    pub fn shift(self, months: i32) -> Self {
        let idx = self.index() - 1 + i64::from(months);
        Self {
            year: idx.div_euclid(12) as i32,
            month: idx.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn next(self) -> Self {
        self.shift(1)
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Inclusive number of periods between `self` and `other`, in either order.
    pub fn months_through(self, other: Period) -> usize {
        ((self.index() - other.index()).unsigned_abs() + 1) as usize
    }

    fn index(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month)
    }

    /// Every period from `start` to `end` inclusive, oldest first. Endpoints
    /// given in reverse order are swapped.
    pub fn range(start: Period, end: Period) -> Vec<Period> {
        let (from, to) = if end < start { (end, start) } else { (start, end) };
        let mut out = Vec::with_capacity(from.months_through(to));
        let mut cur = from;
        while cur <= to {
            out.push(cur);
            cur = cur.next();
        }
        out
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Years from the earliest one on record through `current`, ascending.
pub fn years_through(earliest: Option<i32>, current: i32) -> Vec<i32> {
    match earliest {
        Some(first) if first <= current => (first..=current).collect(),
        Some(first) => vec![first],
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_crosses_year_boundaries() {
        let jan = Period::new(1, 2024).unwrap();
        assert_eq!(jan.shift(-1), Period::new(12, 2023).unwrap());
        assert_eq!(jan.shift(-12), Period::new(1, 2023).unwrap());
        assert_eq!(Period::new(12, 2024).unwrap().next(), Period::new(1, 2025).unwrap());
    }

    #[test]
    fn range_is_inclusive_and_order_independent() {
        let a = Period::new(11, 2023).unwrap();
        let b = Period::new(2, 2024).unwrap();
        let fwd = Period::range(a, b);
        assert_eq!(fwd, Period::range(b, a));
        assert_eq!(fwd.len(), 4);
        assert_eq!(fwd.len(), a.months_through(b));
        assert_eq!(fwd[1], Period::new(12, 2023).unwrap());
    }

    #[test]
    fn parse_rejects_bad_months() {
        assert!(Period::parse("2024-13").is_err());
        assert!(Period::parse("2024").is_err());
        assert_eq!(Period::parse(" 2024-03 ").unwrap().to_string(), "2024-03");
    }

    #[test]
    fn years_outside_the_calendar_are_rejected() {
        assert!(matches!(
            Period::parse("200000000-12"),
            Err(BillError::InvalidPeriod { month: 12, year: 200000000 })
        ));
        assert!(Period::new(1, i32::MIN).is_err());
        let last = Period::new(12, NaiveDate::MAX.year()).unwrap();
        assert_eq!(Period::range(last, last), vec![last]);
        assert_eq!(last.shift(-12).year, NaiveDate::MAX.year() - 1);
    }

    #[test]
    fn years_through_handles_empty_store() {
        assert!(years_through(None, 2025).is_empty());
        assert_eq!(years_through(Some(2022), 2025), vec![2022, 2023, 2024, 2025]);
    }
}
