// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Who owes whom for bills shared between the two payers.
//!
//! Sign convention: a positive balance means Payer A paid more than half of
//! the split bills and Payer B owes Payer A; negative means Payer A owes
//! Payer B. The adjustment is always added in Payer A's favour.

use crate::models::{Bill, Payer};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceResult {
    pub paid_by_a: Decimal,
    pub paid_by_b: Decimal,
    /// Split bills paid by someone else. Counted in the total, credited to
    /// neither payer.
    pub paid_by_other: Decimal,
    pub total_split: Decimal,
    pub half_share: Decimal,
    pub raw_balance: Decimal,
    pub adjustment: Decimal,
    pub adjusted_balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Settlement {
    BOwesA(Decimal),
    AOwesB(Decimal),
    Even,
}

impl BalanceResult {
    pub fn settlement(&self) -> Settlement {
        let b = self.adjusted_balance;
        if b > Decimal::ZERO {
            Settlement::BOwesA(b)
        } else if b < Decimal::ZERO {
            Settlement::AOwesB(-b)
        } else {
            Settlement::Even
        }
    }
}

pub fn reconcile(table: &[Bill], adjustment: Decimal) -> BalanceResult {
    let mut paid_by_a = Decimal::ZERO;
    let mut paid_by_b = Decimal::ZERO;
    let mut paid_by_other = Decimal::ZERO;
    for bill in table.iter().filter(|b| b.is_split) {
        match bill.payer {
            Payer::PayerA => paid_by_a += bill.amount,
            Payer::PayerB => paid_by_b += bill.amount,
            Payer::Other => paid_by_other += bill.amount,
        }
    }
    let total_split = paid_by_a + paid_by_b + paid_by_other;
    let half_share = total_split / Decimal::TWO;
    let raw_balance = paid_by_a - half_share;
    BalanceResult {
        paid_by_a,
        paid_by_b,
        paid_by_other,
        total_split,
        half_share,
        raw_balance,
        adjustment,
        adjusted_balance: raw_balance + adjustment,
    }
}
