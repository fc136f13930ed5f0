// rosterd-config/tests/load_validation.rs
// ============================================================================
// Module: Config Load Tests
// Description: Validate TOML loading behavior against real files.
// Purpose: Ensure load parses valid config and fails closed on bad input.
// Dependencies: rosterd-config, tempfile
// ============================================================================

//! Config file loading tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions use unwrap for clarity."
)]

use std::fs;

use rosterd_config::ConfigError;
use rosterd_config::RosterdConfig;
use rosterd_config::StoreType;

#[test]
fn load_parses_full_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rosterd.toml");
    fs::write(
        &path,
        r#"
[server]
bind = "127.0.0.1:8088"
max_body_bytes = 32768
store_timeout_ms = 2000

[auth]
secret = "file-configured-secret-value"
token_ttl_seconds = 600

[store]
type = "sqlite"
path = "positions.db"
busy_timeout_ms = 1500
journal_mode = "wal"
sync_mode = "normal"
"#,
    )
    .expect("write config");

    let config = RosterdConfig::load(Some(&path)).expect("load");
    assert_eq!(config.server.bind, "127.0.0.1:8088");
    assert_eq!(config.server.store_timeout_ms, 2_000);
    assert_eq!(config.auth.token_ttl_seconds, 600);
    assert_eq!(config.store.store_type, StoreType::Sqlite);
    assert_eq!(config.store.busy_timeout_ms, 1_500);
}

#[test]
fn load_applies_section_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rosterd.toml");
    fs::write(
        &path,
        r#"
[auth]
secret = "file-configured-secret-value"
"#,
    )
    .expect("write config");

    let config = RosterdConfig::load(Some(&path)).expect("load");
    assert_eq!(config.server.bind, "127.0.0.1:5000");
    assert_eq!(config.store.store_type, StoreType::Memory);
}

#[test]
fn load_rejects_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");
    let result = RosterdConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn load_rejects_malformed_toml() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rosterd.toml");
    fs::write(&path, "[auth\nsecret = ").expect("write config");
    let result = RosterdConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn load_rejects_invalid_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rosterd.toml");
    fs::write(
        &path,
        r#"
[auth]
secret = "file-configured-secret-value"

[store]
type = "sqlite"
"#,
    )
    .expect("write config");
    let result = RosterdConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn load_rejects_oversized_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rosterd.toml");
    let padding = format!("# {}\n", "a".repeat(1024 * 1024 + 16));
    fs::write(&path, padding).expect("write config");
    let result = RosterdConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}
