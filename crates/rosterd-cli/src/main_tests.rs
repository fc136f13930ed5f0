// crates/rosterd-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for CLI argument parsing in the entry point.
// Purpose: Ensure subcommand and flag shapes parse as documented.
// Dependencies: rosterd-cli main helpers
// ============================================================================

//! ## Overview
//! Validates the clap surface: subcommand selection, flag values, and
//! rejection of malformed invocations.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use clap::Parser;

use super::Cli;
use super::Commands;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn serve_parses_config_path() {
    let cli = Cli::try_parse_from(["rosterd", "serve", "--config", "/etc/rosterd.toml"])
        .expect("parse serve");
    match cli.command {
        Some(Commands::Serve(command)) => {
            assert_eq!(command.config, Some(PathBuf::from("/etc/rosterd.toml")));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn serve_config_path_is_optional() {
    let cli = Cli::try_parse_from(["rosterd", "serve"]).expect("parse serve");
    match cli.command {
        Some(Commands::Serve(command)) => assert!(command.config.is_none()),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn mint_token_parses_user_and_ttl() {
    let cli = Cli::try_parse_from(["rosterd", "mint-token", "--user", "7", "--ttl", "60"])
        .expect("parse mint-token");
    match cli.command {
        Some(Commands::MintToken(command)) => {
            assert_eq!(command.user, 7);
            assert_eq!(command.ttl, Some(60));
            assert!(command.config.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn mint_token_requires_user() {
    assert!(Cli::try_parse_from(["rosterd", "mint-token"]).is_err());
}

#[test]
fn version_flag_parses_without_subcommand() {
    let cli = Cli::try_parse_from(["rosterd", "--version"]).expect("parse version");
    assert!(cli.show_version);
    assert!(cli.command.is_none());
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["rosterd", "frobnicate"]).is_err());
}
