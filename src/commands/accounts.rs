// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppContext;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let names = ctx.store.distinct_account_names();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &names)? {
        return Ok(());
    }
    if names.is_empty() {
        println!("No accounts recorded yet.");
        return Ok(());
    }
    let rows = names.into_iter().map(|n| vec![n]).collect();
    println!("{}", pretty_table(&["Account"], rows));
    Ok(())
}

pub fn years(ctx: &AppContext, sub: &clap::ArgMatches) -> Result<()> {
    let years = ctx.store.available_years();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &years)? {
        return Ok(());
    }
    if years.is_empty() {
        println!("No bills recorded yet.");
        return Ok(());
    }
    let line: Vec<String> = years.iter().map(|y| y.to_string()).collect();
    println!("{}", line.join(" "));
    Ok(())
}
