// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billbook::config::{AppContext, Config};
use billbook::models::NewBill;
use billbook::store::sqlite::SqliteStore;
use billbook::{cli, commands::exporter};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::tempdir;

fn base_ctx() -> AppContext {
    let ctx = AppContext::new(
        Config::default(),
        Box::new(SqliteStore::in_memory().unwrap()),
    );
    let bills = [
        ("Electricity", Decimal::new(12040, 2), "Payer A", true, 1),
        ("Water", Decimal::new(40, 0), "Payer B", false, 2),
        ("Electricity", Decimal::new(150, 0), "Payer B", true, 2),
    ];
    for (name, amount, payer, split, month) in bills {
        assert!(ctx.store.insert(&NewBill {
            account_name: name.to_string(),
            amount,
            payment_date: NaiveDate::from_ymd_opt(2025, month, 3).unwrap(),
            instance: String::new(),
            payer: payer.to_string(),
            is_split: split,
            receipt_link: None,
            invoice_link: Some("https://invoices.example/x".to_string()),
            month,
            year: 2025,
        }));
    }
    ctx
}

fn export(ctx: &AppContext, args: &[&str]) {
    let matches = cli::build_cli().get_matches_from(args);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(ctx, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_bills_as_pretty_json() {
    let ctx = base_ctx();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("bills.json");
    let out_str = out_path.to_string_lossy().to_string();

    export(
        &ctx,
        &[
            "billbook", "export", "bills", "--from", "2025-02", "--to", "2025-01", "--account",
            "Electricity", "--format", "json", "--out", &out_str,
        ],
    );

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": 1,
                "year": 2025,
                "month": 1,
                "payment_date": "2025-01-03",
                "account_name": "Electricity",
                "instance": "",
                "payer": "Payer A",
                "amount": "120.40",
                "is_split": true,
                "receipt_link": null,
                "invoice_link": "https://invoices.example/x"
            },
            {
                "id": 3,
                "year": 2025,
                "month": 2,
                "payment_date": "2025-02-03",
                "account_name": "Electricity",
                "instance": "",
                "payer": "Payer B",
                "amount": "150",
                "is_split": true,
                "receipt_link": null,
                "invoice_link": "https://invoices.example/x"
            }
        ])
    );
}

#[test]
fn export_bills_as_csv() {
    let ctx = base_ctx();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("bills.csv");
    let out_str = out_path.to_string_lossy().to_string();

    export(
        &ctx,
        &[
            "billbook", "export", "bills", "--from", "2025-01", "--to", "2025-02", "--out",
            &out_str,
        ],
    );

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[0], "id");
    assert_eq!(&headers[7], "amount");
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 3);
    assert_eq!(&records[1][4], "Water");
    assert_eq!(&records[1][6], "Payer B");
    assert_eq!(&records[1][8], "false");
    assert_eq!(&records[2][2], "2");
}

#[test]
fn export_keeps_third_party_payer_labels() {
    let ctx = base_ctx();
    assert!(ctx.store.insert(&NewBill {
        account_name: "Gym".to_string(),
        amount: Decimal::new(60, 0),
        payment_date: NaiveDate::from_ymd_opt(2025, 2, 9).unwrap(),
        instance: String::new(),
        payer: "Grandma".to_string(),
        is_split: false,
        receipt_link: None,
        invoice_link: None,
        month: 2,
        year: 2025,
    }));
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("gym.csv");
    let out_str = out_path.to_string_lossy().to_string();

    export(
        &ctx,
        &[
            "billbook", "export", "bills", "--from", "2025-02", "--to", "2025-02", "--account",
            "Gym", "--out", &out_str,
        ],
    );

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(&records[0][6], "Grandma");
}
