// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{BillStore, account_names};
use crate::models::{BillPatch, NewBill, RawBill};
use crate::period::{Period, years_through};
use anyhow::Result;
use chrono::Datelike;
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, params, params_from_iter};
use std::path::Path;
use tracing::{debug, warn};

/// Local `bills` table in the application's SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Result<Self> {
        crate::db::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open(path: Option<&Path>) -> Result<Self> {
        Ok(Self {
            conn: crate::db::open_or_init(path)?,
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn try_fetch_period(&self, period: Period) -> rusqlite::Result<Vec<RawBill>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, account_name, amount, payment_date, instance, payer, is_split,
                    receipt_link, invoice_link, month, year
             FROM bills WHERE month=?1 AND year=?2 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![period.month, period.year], |r| {
            Ok(RawBill {
                id: r.get(0)?,
                account_name: r.get(1)?,
                amount: sql_to_json(r.get(2)?),
                payment_date: r.get(3)?,
                instance: r.get(4)?,
                payer: r.get(5)?,
                is_split: r.get(6)?,
                receipt_link: r.get(7)?,
                invoice_link: r.get(8)?,
                month: r.get(9)?,
                year: r.get(10)?,
            })
        })?;
        rows.collect()
    }

    fn try_insert(&self, bill: &NewBill) -> rusqlite::Result<usize> {
        self.conn.execute(
            "INSERT INTO bills(account_name, amount, payment_date, instance, payer, is_split,
                               receipt_link, invoice_link, month, year)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                bill.account_name,
                bill.amount.to_string(),
                bill.payment_date.to_string(),
                bill.instance,
                bill.payer,
                bill.is_split,
                bill.receipt_link,
                bill.invoice_link,
                bill.month,
                bill.year
            ],
        )
    }

    fn try_update(&self, id: i64, patch: &BillPatch) -> rusqlite::Result<usize> {
        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();

        if let Some(v) = &patch.account_name {
            sets.push("account_name=?");
            values.push(SqlValue::Text(v.clone()));
        }
        if let Some(v) = &patch.amount {
            sets.push("amount=?");
            values.push(SqlValue::Text(v.to_string()));
        }
        if let Some(v) = &patch.payment_date {
            sets.push("payment_date=?");
            values.push(SqlValue::Text(v.to_string()));
        }
        if let Some(v) = &patch.instance {
            sets.push("instance=?");
            values.push(SqlValue::Text(v.clone()));
        }
        if let Some(v) = &patch.payer {
            sets.push("payer=?");
            values.push(SqlValue::Text(v.clone()));
        }
        if let Some(v) = patch.is_split {
            sets.push("is_split=?");
            values.push(SqlValue::Integer(v as i64));
        }
        if let Some(v) = &patch.receipt_link {
            sets.push("receipt_link=?");
            values.push(SqlValue::Text(v.clone()));
        }
        if let Some(v) = &patch.invoice_link {
            sets.push("invoice_link=?");
            values.push(SqlValue::Text(v.clone()));
        }
        if let Some(v) = patch.month {
            sets.push("month=?");
            values.push(SqlValue::Integer(v as i64));
        }
        if let Some(v) = patch.year {
            sets.push("year=?");
            values.push(SqlValue::Integer(v as i64));
        }
        if sets.is_empty() {
            return Ok(0);
        }

        let sql = format!("UPDATE bills SET {} WHERE id=?", sets.join(", "));
        values.push(SqlValue::Integer(id));
        self.conn.execute(&sql, params_from_iter(values))
    }

    fn try_account_rows(&self) -> rusqlite::Result<Vec<(Option<String>, Option<String>)>> {
        let mut stmt = self.conn.prepare("SELECT account_name, instance FROM bills")?;
        let rows = stmt.query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?;
        rows.collect()
    }

    fn try_first_year(&self) -> rusqlite::Result<Option<i32>> {
        self.conn
            .query_row("SELECT MIN(year) FROM bills", [], |r| r.get(0))
    }
}

fn sql_to_json(v: SqlValue) -> serde_json::Value {
    match v {
        SqlValue::Null | SqlValue::Blob(_) => serde_json::Value::Null,
        SqlValue::Integer(i) => serde_json::Value::from(i),
        SqlValue::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        SqlValue::Text(s) => serde_json::Value::String(s),
    }
}

impl BillStore for SqliteStore {
    fn fetch_period(&self, period: Period) -> Vec<RawBill> {
        match self.try_fetch_period(period) {
            Ok(rows) => {
                debug!(%period, rows = rows.len(), "fetched period from sqlite");
                rows
            }
            Err(e) => {
                warn!(%period, error = %e, "sqlite fetch failed; treating period as empty");
                Vec::new()
            }
        }
    }

    fn insert(&self, bill: &NewBill) -> bool {
        match self.try_insert(bill) {
            Ok(n) => n == 1,
            Err(e) => {
                warn!(error = %e, account = %bill.account_name, "sqlite insert failed");
                false
            }
        }
    }

    fn update(&self, id: i64, patch: &BillPatch) -> bool {
        match self.try_update(id, patch) {
            Ok(n) => n == 1,
            Err(e) => {
                warn!(id, error = %e, "sqlite update failed");
                false
            }
        }
    }

    fn delete(&self, id: i64) -> bool {
        match self.conn.execute("DELETE FROM bills WHERE id=?1", params![id]) {
            Ok(n) => n == 1,
            Err(e) => {
                warn!(id, error = %e, "sqlite delete failed");
                false
            }
        }
    }

    fn distinct_account_names(&self) -> Vec<String> {
        match self.try_account_rows() {
            Ok(rows) => account_names(rows),
            Err(e) => {
                warn!(error = %e, "sqlite account name query failed");
                Vec::new()
            }
        }
    }

    fn available_years(&self) -> Vec<i32> {
        match self.try_first_year() {
            Ok(first) => years_through(first, chrono::Local::now().year()),
            Err(e) => {
                warn!(error = %e, "sqlite year query failed");
                Vec::new()
            }
        }
    }
}
