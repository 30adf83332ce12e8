// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use billbook::config::{Backend, Config, ENV_REST_KEY, ENV_REST_URL};
use billbook::loader::AmountPolicy;
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::from_path(&dir.path().join("config.json")).unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.backend, Backend::Sqlite { path: None });
    assert_eq!(cfg.amount_policy, AmountPolicy::Lenient);
}

#[test]
fn partial_file_fills_in_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{
            "backend": {{"kind": "rest", "url": "https://x.supabase.co", "key": "secret"}},
            "payers": {{"a": "Roman", "b": "Tati"}},
            "adjustment": 929,
            "amount_policy": "strict"
        }}"#
    )
    .unwrap();
    file.flush().unwrap();

    let cfg = Config::from_path(file.path()).unwrap();
    assert_eq!(
        cfg.backend,
        Backend::Rest {
            url: "https://x.supabase.co".into(),
            key: "secret".into(),
            table: "bills".into(),
        }
    );
    assert_eq!(cfg.payers.a, "Roman");
    assert_eq!(cfg.adjustment, Decimal::from(929));
    assert_eq!(cfg.amount_policy, AmountPolicy::Strict);
    assert_eq!(cfg.load_options().policy, AmountPolicy::Strict);
    assert!(!cfg.comparison_accounts.is_empty());

    let shown = serde_json::to_string(&cfg.redacted()).unwrap();
    assert!(!shown.contains("secret"));
}

#[test]
fn broken_file_is_an_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{{ not json").unwrap();
    file.flush().unwrap();
    assert!(Config::from_path(file.path()).is_err());
}

#[test]
fn env_selects_rest_backend_only_with_url_and_key() {
    let mut cfg = Config::default();
    cfg.apply_env(|k| (k == ENV_REST_URL).then(|| "https://y.supabase.co".to_string()));
    assert_eq!(cfg.backend, Backend::Sqlite { path: None });

    cfg.apply_env(|k| match k {
        ENV_REST_URL => Some("https://y.supabase.co".to_string()),
        ENV_REST_KEY => Some("k".to_string()),
        _ => None,
    });
    assert_eq!(
        cfg.backend,
        Backend::Rest {
            url: "https://y.supabase.co".into(),
            key: "k".into(),
            table: "bills".into(),
        }
    );
}
