// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppContext;
use crate::loader::load_range;
use crate::utils::range_args;
use anyhow::{Context, Result};
use serde_json::json;

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("bills", sub)) => export_bills(ctx, sub),
        _ => Ok(()),
    }
}

fn export_bills(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let out = sub.get_one::<String>("out").context("--out is required")?.trim();
    let (from, to) = range_args(sub)?;
    let account = sub.get_one::<String>("account").map(|s| s.as_str());

    let bills = load_range(&*ctx.store, from, to, account, &ctx.config.load_options())?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr =
                csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
            wtr.write_record([
                "id",
                "year",
                "month",
                "payment_date",
                "account_name",
                "instance",
                "payer",
                "amount",
                "is_split",
                "receipt_link",
                "invoice_link",
            ])?;
            for b in &bills {
                wtr.write_record([
                    b.id.to_string(),
                    b.period.year.to_string(),
                    b.period.month.to_string(),
                    b.payment_date.map(|d| d.to_string()).unwrap_or_default(),
                    b.account_name.clone(),
                    b.instance.clone(),
                    b.payer_label.clone(),
                    b.amount.to_string(),
                    b.is_split.to_string(),
                    b.receipt_link.clone().unwrap_or_default(),
                    b.invoice_link.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = bills
                .iter()
                .map(|b| {
                    json!({
                        "id": b.id,
                        "year": b.period.year,
                        "month": b.period.month,
                        "payment_date": b.payment_date.map(|d| d.to_string()),
                        "account_name": b.account_name,
                        "instance": b.instance,
                        "payer": b.payer_label,
                        "amount": b.amount.to_string(),
                        "is_split": b.is_split,
                        "receipt_link": b.receipt_link,
                        "invoice_link": b.invoice_link,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out))?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} bills to {}", bills.len(), out);
    Ok(())
}
