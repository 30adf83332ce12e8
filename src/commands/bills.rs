// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppContext;
use crate::loader::load_period;
use crate::models::{BillPatch, NewBill, OTHER_PAYER, SaveRequest};
use crate::period::Period;
use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_decimal, parse_period, period_or_today,
    pretty_table,
};
use anyhow::{Context, Result, bail};
use serde::Serialize;

pub fn handle(ctx: &AppContext, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("edit", sub)) => edit(ctx, sub)?,
        Some(("rm", sub)) => rm(ctx, sub)?,
        Some(("list", sub)) => list(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn check_payer(ctx: &AppContext, payer: &str) -> Result<String> {
    let payer = payer.trim();
    let names = &ctx.config.payers;
    if payer == names.a || payer == names.b || payer == OTHER_PAYER {
        Ok(payer.to_string())
    } else {
        bail!(
            "Unknown payer '{}', expected '{}', '{}' or '{}'",
            payer,
            names.a,
            names.b,
            OTHER_PAYER
        )
    }
}

fn opt_string(sub: &clap::ArgMatches, id: &str) -> Option<String> {
    sub.get_one::<String>(id).map(|s| s.trim().to_string())
}

/// Builds the create request for `bill add`.
pub fn new_bill_request(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<SaveRequest> {
    let account_name = sub
        .get_one::<String>("account")
        .context("--account is required")?
        .trim()
        .to_string();
    if account_name.is_empty() {
        bail!("Account name cannot be empty");
    }
    let amount = parse_decimal(sub.get_one::<String>("amount").context("--amount is required")?)?;
    if amount.is_sign_negative() {
        bail!("Amount cannot be negative: {}", amount);
    }
    let payment_date = parse_date(sub.get_one::<String>("date").context("--date is required")?)?;
    let payer = check_payer(ctx, sub.get_one::<String>("payer").context("--payer is required")?)?;
    let period = match sub.get_one::<String>("period") {
        Some(p) => parse_period(p)?,
        None => Period::of_date(payment_date),
    };
    Ok(SaveRequest::Create(NewBill {
        account_name,
        amount,
        payment_date,
        instance: opt_string(sub, "instance").unwrap_or_default(),
        payer,
        is_split: sub.get_flag("split"),
        receipt_link: opt_string(sub, "receipt").filter(|s| !s.is_empty()),
        invoice_link: opt_string(sub, "invoice").filter(|s| !s.is_empty()),
        month: period.month,
        year: period.year,
    }))
}

/// Builds the update request for `bill edit`. Only given flags are changed.
pub fn edit_bill_request(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<SaveRequest> {
    let id = *sub.get_one::<i64>("id").context("bill id is required")?;
    let mut patch = BillPatch {
        account_name: opt_string(sub, "account"),
        instance: opt_string(sub, "instance"),
        receipt_link: opt_string(sub, "receipt"),
        invoice_link: opt_string(sub, "invoice"),
        is_split: sub.get_one::<bool>("split").copied(),
        ..BillPatch::default()
    };
    if let Some(a) = sub.get_one::<String>("amount") {
        let amount = parse_decimal(a)?;
        if amount.is_sign_negative() {
            bail!("Amount cannot be negative: {}", amount);
        }
        patch.amount = Some(amount);
    }
    if let Some(d) = sub.get_one::<String>("date") {
        patch.payment_date = Some(parse_date(d)?);
    }
    if let Some(p) = sub.get_one::<String>("payer") {
        patch.payer = Some(check_payer(ctx, p)?);
    }
    if let Some(p) = sub.get_one::<String>("period") {
        let period = parse_period(p)?;
        patch.month = Some(period.month);
        patch.year = Some(period.year);
    }
    if patch.is_empty() {
        bail!("Nothing to change for bill {}", id);
    }
    Ok(SaveRequest::Update(id, patch))
}

fn add(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let req = new_bill_request(ctx, sub)?;
    if !ctx.store.save(&req) {
        bail!("The store did not accept the new bill");
    }
    if let SaveRequest::Create(b) = &req {
        println!(
            "Recorded {} for '{}' paid by {} on {} ({:04}-{:02})",
            fmt_money(&b.amount),
            b.account_name,
            b.payer,
            b.payment_date,
            b.year,
            b.month
        );
    }
    Ok(())
}

fn edit(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let req = edit_bill_request(ctx, sub)?;
    if !ctx.store.save(&req) {
        bail!("The store did not update the bill");
    }
    if let SaveRequest::Update(id, _) = req {
        println!("Updated bill {}", id);
    }
    Ok(())
}

fn rm(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("bill id is required")?;
    if !ctx.store.delete(id) {
        bail!("The store did not delete bill {}", id);
    }
    println!("Removed bill {}", id);
    Ok(())
}

fn list(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(ctx, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        if data.is_empty() {
            println!("No bills for this period.");
            return Ok(());
        }
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.account.clone(),
                    r.instance.clone(),
                    r.payer.clone(),
                    r.amount.clone(),
                    if r.split { "yes".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Paid on", "Account", "Instance", "Payer", "Amount", "Split"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct BillRow {
    pub id: i64,
    pub period: String,
    pub date: String,
    pub account: String,
    pub instance: String,
    pub payer: String,
    pub amount: String,
    pub split: bool,
    pub receipt: String,
    pub invoice: String,
}

pub fn query_rows(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<Vec<BillRow>> {
    let period = period_or_today(sub)?;
    let account = sub.get_one::<String>("account").map(|s| s.as_str());
    let mut bills = load_period(&*ctx.store, period, account, &ctx.config.load_options())?;
    bills.sort_by(|a, b| a.payment_date.cmp(&b.payment_date).then(a.id.cmp(&b.id)));
    Ok(bills
        .into_iter()
        .map(|b| BillRow {
            id: b.id,
            period: b.period.to_string(),
            date: b.payment_date.map(|d| d.to_string()).unwrap_or_default(),
            amount: fmt_money(&b.amount),
            split: b.is_split,
            receipt: b.receipt_link.unwrap_or_default(),
            invoice: b.invoice_link.unwrap_or_default(),
            payer: b.payer_label,
            account: b.account_name,
            instance: b.instance,
        })
        .collect())
}
