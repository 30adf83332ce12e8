// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::period::Period;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Account filter value that means "no filter".
pub const ALL_ACCOUNTS: &str = "All accounts";

/// Label stored for bills paid by neither named payer.
pub const OTHER_PAYER: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Payer {
    PayerA,
    PayerB,
    Other,
}

/// Display labels the store uses for the two named payers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerNames {
    pub a: String,
    pub b: String,
}

impl Default for PayerNames {
    fn default() -> Self {
        Self {
            a: "Payer A".to_string(),
            b: "Payer B".to_string(),
        }
    }
}

impl PayerNames {
    pub fn resolve(&self, label: &str) -> Payer {
        let label = label.trim();
        if label == self.a {
            Payer::PayerA
        } else if label == self.b {
            Payer::PayerB
        } else {
            Payer::Other
        }
    }
}

/// A row as the store returned it, before any coercion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBill {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub amount: serde_json::Value,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub instance: Option<String>,
    #[serde(default)]
    pub payer: Option<String>,
    #[serde(default)]
    pub is_split: Option<bool>,
    #[serde(default)]
    pub receipt_link: Option<String>,
    #[serde(default)]
    pub invoice_link: Option<String>,
    #[serde(default)]
    pub month: Option<i64>,
    #[serde(default)]
    pub year: Option<i64>,
}

fn text_field(row: &Map<String, Value>, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn int_field(row: &Map<String, Value>, key: &str) -> Option<i64> {
    match row.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn flag_field(row: &Map<String, Value>, key: &str) -> Option<bool> {
    match row.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

impl RawBill {
    /// Reads one JSON row field by field. A field of the wrong type is
    /// coerced where that is unambiguous and dropped otherwise, so a single
    /// odd column never discards the row. `None` when the row is not an
    /// object at all.
    pub fn from_json_row(row: &Value) -> Option<Self> {
        let obj = row.as_object()?;
        Some(Self {
            id: int_field(obj, "id"),
            account_name: text_field(obj, "account_name"),
            amount: obj.get("amount").cloned().unwrap_or(Value::Null),
            payment_date: text_field(obj, "payment_date"),
            instance: text_field(obj, "instance"),
            payer: text_field(obj, "payer"),
            is_split: flag_field(obj, "is_split"),
            receipt_link: text_field(obj, "receipt_link"),
            invoice_link: text_field(obj, "invoice_link"),
            month: int_field(obj, "month"),
            year: int_field(obj, "year"),
        })
    }
}

/// One paid expense, as the engine sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bill {
    pub id: i64,
    pub account_name: String,
    pub amount: Decimal,
    pub payment_date: Option<NaiveDate>,
    pub instance: String,
    pub payer: Payer,
    /// The payer exactly as stored, kept for listings and exports.
    pub payer_label: String,
    pub is_split: bool,
    pub receipt_link: Option<String>,
    pub invoice_link: Option<String>,
    pub period: Period,
}

pub type BillTable = Vec<Bill>;

/// Fields of a bill that does not exist yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBill {
    pub account_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub instance: String,
    pub payer: String,
    pub is_split: bool,
    pub receipt_link: Option<String>,
    pub invoice_link: Option<String>,
    pub month: u32,
    pub year: i32,
}

/// Fields to change on an existing bill. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_split: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl BillPatch {
    pub fn is_empty(&self) -> bool {
        *self == BillPatch::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveRequest {
    Create(NewBill),
    Update(i64, BillPatch),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub month: u32,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: Decimal,
}
