// rosterd-config/tests/config_defaults.rs
// ============================================================================
// Module: Config Defaults and Core Validation Tests
// Description: Validate default behavior and config invariants.
// Purpose: Ensure minimal config is valid and limits are enforced fail-closed.
// Dependencies: rosterd-config
// ============================================================================

//! Config defaults and validation tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions use unwrap for clarity."
)]

use rosterd_config::ConfigError;
use rosterd_config::RosterdConfig;
use rosterd_config::StoreType;

type TestResult = Result<(), String>;

fn minimal_config() -> RosterdConfig {
    let mut config = RosterdConfig::default();
    config.auth.secret = Some("integration-test-secret".to_string());
    config
}

fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn minimal_config_validates() -> TestResult {
    minimal_config().validate().map_err(|err| err.to_string())
}

#[test]
fn defaults_match_documented_values() {
    let config = minimal_config();
    assert_eq!(config.server.bind, "127.0.0.1:5000");
    assert_eq!(config.auth.token_ttl_seconds, 900);
    assert_eq!(config.store.store_type, StoreType::Memory);
}

#[test]
fn missing_secret_is_rejected() -> TestResult {
    let config = RosterdConfig::default();
    assert_invalid(config.validate(), "auth.secret is required")
}

#[test]
fn short_secret_is_rejected() -> TestResult {
    let mut config = minimal_config();
    config.auth.secret = Some("short".to_string());
    assert_invalid(config.validate(), "auth.secret must be between")
}

#[test]
fn token_ttl_out_of_bounds_is_rejected() -> TestResult {
    let mut config = minimal_config();
    config.auth.token_ttl_seconds = 1;
    assert_invalid(config.validate(), "auth.token_ttl_seconds must be between")?;
    config.auth.token_ttl_seconds = 1_000_000;
    assert_invalid(config.validate(), "auth.token_ttl_seconds must be between")
}

#[test]
fn sqlite_store_requires_path() -> TestResult {
    let mut config = minimal_config();
    config.store.store_type = StoreType::Sqlite;
    assert_invalid(config.validate(), "store.path is required for sqlite")
}

#[test]
fn invalid_bind_is_rejected() -> TestResult {
    let mut config = minimal_config();
    config.server.bind = "not-an-address".to_string();
    assert_invalid(config.validate(), "server.bind must be a socket address")
}

#[test]
fn body_limit_out_of_bounds_is_rejected() -> TestResult {
    let mut config = minimal_config();
    config.server.max_body_bytes = 16;
    assert_invalid(config.validate(), "server.max_body_bytes must be between")
}

#[test]
fn store_timeout_out_of_bounds_is_rejected() -> TestResult {
    let mut config = minimal_config();
    config.server.store_timeout_ms = 1;
    assert_invalid(config.validate(), "server.store_timeout_ms must be between")
}
