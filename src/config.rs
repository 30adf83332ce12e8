// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::APP;
use crate::loader::{AmountPolicy, LoadOptions};
use crate::models::PayerNames;
use crate::store::BillStore;
use crate::store::rest::RestStore;
use crate::store::sqlite::SqliteStore;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_REST_URL: &str = "BILLBOOK_REST_URL";
pub const ENV_REST_KEY: &str = "BILLBOOK_REST_KEY";
pub const ENV_REST_TABLE: &str = "BILLBOOK_REST_TABLE";
const DEFAULT_TABLE: &str = "bills";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Backend {
    Sqlite {
        #[serde(default)]
        path: Option<PathBuf>,
    },
    Rest {
        url: String,
        key: String,
        #[serde(default = "default_table")]
        table: String,
    },
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Sqlite { path: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    pub payers: PayerNames,
    /// Fixed correction added to every split balance in Payer A's favour.
    pub adjustment: Decimal,
    pub amount_policy: AmountPolicy,
    /// Accounts shown in month-over-month and year-over-year comparisons.
    pub comparison_accounts: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            payers: PayerNames::default(),
            adjustment: Decimal::ZERO,
            amount_policy: AmountPolicy::Lenient,
            comparison_accounts: ["Condo", "Electricity", "Housekeeper", "Credit card", "Gas"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")?;
    Ok(proj.config_dir().join("config.json"))
}

impl Config {
    /// Reads the platform config file (defaults when absent) and applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::from_path(&config_path()?)?;
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Read config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Parse config {}", path.display()))
    }

    /// A REST URL and key in the environment select the REST backend.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let (Some(url), Some(key)) = (var(ENV_REST_URL), var(ENV_REST_KEY)) {
            let table = var(ENV_REST_TABLE).unwrap_or_else(default_table);
            self.backend = Backend::Rest { url, key, table };
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            policy: self.amount_policy,
            payers: self.payers.clone(),
        }
    }

    pub fn open_store(&self) -> Result<Box<dyn BillStore>> {
        let store: Box<dyn BillStore> = match &self.backend {
            Backend::Sqlite { path } => Box::new(SqliteStore::open(path.as_deref())?),
            Backend::Rest { url, key, table } => Box::new(RestStore::new(url, key, table)?),
        };
        Ok(store)
    }

    /// Copy safe to print: the REST key is masked.
    pub fn redacted(&self) -> Self {
        let mut c = self.clone();
        if let Backend::Rest { key, .. } = &mut c.backend {
            *key = "***".to_string();
        }
        c
    }
}

/// Config plus the store it points at, handed to every command.
pub struct AppContext {
    pub config: Config,
    pub store: Box<dyn BillStore>,
}

impl AppContext {
    pub fn new(config: Config, store: Box<dyn BillStore>) -> Self {
        Self { config, store }
    }

    pub fn open(config: Config) -> Result<Self> {
        let store = config.open_store()?;
        Ok(Self { config, store })
    }
}
