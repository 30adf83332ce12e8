// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! PostgREST-style table endpoint (as exposed by Supabase).

use super::{BillStore, account_names};
use crate::models::{BillPatch, NewBill, RawBill};
use crate::period::{Period, years_through};
use crate::utils::http_client;
use anyhow::Result;
use chrono::Datelike;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteOp {
    Insert,
    Update,
    Delete,
}

fn write_succeeded(op: WriteOp, status: StatusCode) -> bool {
    match op {
        WriteOp::Insert => status == StatusCode::CREATED,
        WriteOp::Update | WriteOp::Delete => {
            status == StatusCode::OK || status == StatusCode::NO_CONTENT
        }
    }
}

#[derive(Debug, Deserialize)]
struct NameRow {
    account_name: Option<String>,
    instance: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YearRow {
    #[serde(default)]
    year: serde_json::Value,
}

impl YearRow {
    fn as_year(&self) -> Option<i32> {
        match &self.year {
            serde_json::Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Converts a fetched body row by row; only rows that are not objects are
/// skipped.
fn raw_rows(period: Period, rows: &[serde_json::Value]) -> Vec<RawBill> {
    rows.iter()
        .filter_map(|row| {
            let raw = RawBill::from_json_row(row);
            if raw.is_none() {
                warn!(%period, %row, "skipping rest row that is not an object");
            }
            raw
        })
        .collect()
}

pub struct RestStore {
    client: Client,
    base_url: String,
    key: String,
    table: String,
}

impl RestStore {
    pub fn new(base_url: &str, key: &str, table: &str) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            table: table.to_string(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn period_url(&self, period: Period) -> String {
        format!(
            "{}?month=eq.{}&year=eq.{}&select=*",
            self.table_url(),
            period.month,
            period.year
        )
    }

    fn id_url(&self, id: i64) -> String {
        format!("{}?id=eq.{}", self.table_url(), id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self.request(Method::GET, url).send()?.error_for_status()?;
        Ok(resp.json()?)
    }

    fn send_write(&self, op: WriteOp, req: RequestBuilder) -> bool {
        match req.send() {
            Ok(resp) => {
                let status = resp.status();
                let ok = write_succeeded(op, status);
                if !ok {
                    warn!(?op, %status, "store rejected write");
                }
                ok
            }
            Err(e) => {
                warn!(?op, error = %e, "store write failed");
                false
            }
        }
    }
}

impl BillStore for RestStore {
    fn fetch_period(&self, period: Period) -> Vec<RawBill> {
        match self.get_json::<Vec<serde_json::Value>>(&self.period_url(period)) {
            Ok(rows) => {
                debug!(%period, rows = rows.len(), "fetched period from rest store");
                raw_rows(period, &rows)
            }
            Err(e) => {
                warn!(%period, error = %e, "rest fetch failed; treating period as empty");
                Vec::new()
            }
        }
    }

    fn insert(&self, bill: &NewBill) -> bool {
        let req = self.request(Method::POST, &self.table_url()).json(&[bill]);
        self.send_write(WriteOp::Insert, req)
    }

    fn update(&self, id: i64, patch: &BillPatch) -> bool {
        let req = self.request(Method::PATCH, &self.id_url(id)).json(patch);
        self.send_write(WriteOp::Update, req)
    }

    fn delete(&self, id: i64) -> bool {
        let req = self
            .request(Method::DELETE, &self.id_url(id))
            .header("Prefer", "return=representation");
        self.send_write(WriteOp::Delete, req)
    }

    fn distinct_account_names(&self) -> Vec<String> {
        let url = format!("{}?select=account_name,instance", self.table_url());
        match self.get_json::<Vec<NameRow>>(&url) {
            Ok(rows) => account_names(rows.into_iter().map(|r| (r.account_name, r.instance))),
            Err(e) => {
                warn!(error = %e, "rest account name query failed");
                Vec::new()
            }
        }
    }

    fn available_years(&self) -> Vec<i32> {
        let url = format!("{}?select=year&order=year.asc&limit=10000", self.table_url());
        match self.get_json::<Vec<YearRow>>(&url) {
            Ok(rows) => {
                let first = rows.iter().filter_map(YearRow::as_year).min();
                years_through(first, chrono::Local::now().year())
            }
            Err(e) => {
                warn!(error = %e, "rest year query failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RestStore {
        RestStore::new("https://example.supabase.co/", "k3y", "bills").unwrap()
    }

    #[test]
    fn urls_follow_postgrest_filters() {
        let s = store();
        assert_eq!(s.table_url(), "https://example.supabase.co/rest/v1/bills");
        assert_eq!(
            s.period_url(Period::new(3, 2024).unwrap()),
            "https://example.supabase.co/rest/v1/bills?month=eq.3&year=eq.2024&select=*"
        );
        assert_eq!(
            s.id_url(42),
            "https://example.supabase.co/rest/v1/bills?id=eq.42"
        );
    }

    #[test]
    fn write_status_codes() {
        assert!(write_succeeded(WriteOp::Insert, StatusCode::CREATED));
        assert!(!write_succeeded(WriteOp::Insert, StatusCode::OK));
        assert!(write_succeeded(WriteOp::Update, StatusCode::NO_CONTENT));
        assert!(write_succeeded(WriteOp::Delete, StatusCode::OK));
        assert!(!write_succeeded(WriteOp::Delete, StatusCode::NOT_FOUND));
    }

    #[test]
    fn years_accept_numbers_and_digit_strings() {
        let rows: Vec<YearRow> =
            serde_json::from_str(r#"[{"year": 2023}, {"year": "2021"}, {"year": null}, {}]"#)
                .unwrap();
        let years: Vec<Option<i32>> = rows.iter().map(YearRow::as_year).collect();
        assert_eq!(years, vec![Some(2023), Some(2021), None, None]);
    }

    fn period() -> Period {
        Period::new(3, 2024).unwrap()
    }

    #[test]
    fn raw_rows_tolerate_missing_and_odd_fields() {
        let body: Vec<serde_json::Value> = serde_json::from_str(
            r#"[{"id": 1, "account_name": "Water", "amount": "12.5", "is_split": true},
                {"id": 2, "amount": null, "payer": "Other"}]"#,
        )
        .unwrap();
        let rows = raw_rows(period(), &body);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].amount, serde_json::json!("12.5"));
        assert_eq!(rows[0].is_split, Some(true));
        assert!(rows[1].account_name.is_none());
    }

    #[test]
    fn mistyped_column_keeps_its_row_and_its_neighbours() {
        let body: Vec<serde_json::Value> = serde_json::from_str(
            r#"[{"id": 1, "account_name": "Water", "amount": 40, "month": 3, "year": 2024},
                {"id": "2", "account_name": "Gas", "amount": 30, "month": 3, "year": "2024",
                 "is_split": "yes", "payer": 7},
                "garbage"]"#,
        )
        .unwrap();
        let rows = raw_rows(period(), &body);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].account_name.as_deref(), Some("Water"));
        assert_eq!(rows[1].id, Some(2));
        assert_eq!(rows[1].year, Some(2024));
        assert_eq!(rows[1].is_split, None);
        assert_eq!(rows[1].payer.as_deref(), Some("7"));
    }
}
