// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use billbook::config::{AppContext, Backend, Config};
use billbook::loader::AmountPolicy;
use billbook::{cli, commands, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut config = Config::load()?;
    if matches.get_flag("strict") {
        config.amount_policy = AmountPolicy::Strict;
    }

    if let Some(("init", _)) = matches.subcommand() {
        match &config.backend {
            Backend::Sqlite { path } => {
                let path = match path {
                    Some(p) => p.clone(),
                    None => db::db_path()?,
                };
                db::open_or_init(Some(path.as_path()))?;
                println!("Database initialized at {}", path.display());
            }
            Backend::Rest { url, .. } => {
                println!("Using remote store at {}; nothing to initialize", url);
            }
        }
        return Ok(());
    }

    let ctx = AppContext::open(config)?;

    match matches.subcommand() {
        Some(("bill", sub)) => commands::bills::handle(&ctx, sub)?,
        Some(("accounts", sub)) => commands::accounts::handle(&ctx, sub)?,
        Some(("years", sub)) => commands::accounts::years(&ctx, sub)?,
        Some(("report", sub)) => commands::reports::handle(&ctx, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ctx, sub)?,
        Some(("config", sub)) => commands::settings::handle(&ctx, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
