// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures surfaced by the library layer. Command handlers wrap these in
/// `anyhow` with additional context.
#[derive(Debug, Error)]
pub enum BillError {
    #[error("Invalid period {month:02}/{year}: month must be 1 to 12 and the year a calendar year")]
    InvalidPeriod { month: u32, year: i32 },
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Malformed amount {value} for '{account}' in {period}")]
    MalformedAmount {
        account: String,
        period: String,
        value: String,
    },
    #[error("Store error: {0}")]
    Store(String),
    #[error("Config error: {0}")]
    Config(String),
}

pub type BillResult<T> = Result<T, BillError>;
