// crates/rosterd-cli/src/main.rs
// ============================================================================
// Module: Rosterd CLI Entry Point
// Description: Command dispatcher for the Rosterd position service.
// Purpose: Run the HTTP server from config and mint operator bearer tokens.
// Dependencies: clap, rosterd-config, rosterd-core, rosterd-http, tokio.
// ============================================================================

//! ## Overview
//! The Rosterd CLI runs the position service and provides an operator-facing
//! token minting utility. Configuration is resolved from `--config`, the
//! `ROSTERD_CONFIG` environment variable, or `rosterd.toml` in the working
//! directory, in that order. All inputs are validated before any server or
//! signing state is constructed.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use rosterd_config::RosterdConfig;
use rosterd_core::UserId;
use rosterd_http::HttpServer;
use rosterd_http::TokenIssuer;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "rosterd", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Rosterd HTTP server.
    Serve(ServeCommand),
    /// Mint a bearer token for a user id.
    MintToken(MintTokenCommand),
}

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Path to the service configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for the `mint-token` subcommand.
#[derive(Args, Debug)]
struct MintTokenCommand {
    /// Path to the service configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// User id the token acts as.
    #[arg(long, value_name = "ID")]
    user: i64,
    /// Token lifetime in seconds (defaults to the configured TTL).
    #[arg(long, value_name = "SECONDS")]
    ttl: Option<u64>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Result alias for CLI command handlers.
type CliResult<T> = Result<T, CliError>;

/// CLI dispatch errors.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration loading or validation failed.
    #[error("config error: {0}")]
    Config(String),
    /// Server construction or serving failed.
    #[error("server error: {0}")]
    Server(String),
    /// Token minting failed.
    #[error("token error: {0}")]
    Token(String),
    /// Writing CLI output failed.
    #[error("output error on {0}")]
    Output(&'static str),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("rosterd {version}")).map_err(|_| CliError::Output("stdout"))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::MintToken(command) => command_mint_token(&command),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Runs the HTTP server from configuration.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = RosterdConfig::load(command.config.as_deref())
        .map_err(|err| CliError::Config(err.to_string()))?;
    let server = HttpServer::from_config(config).map_err(|err| CliError::Server(err.to_string()))?;
    server.serve().await.map_err(|err| CliError::Server(err.to_string()))?;
    Ok(ExitCode::SUCCESS)
}

/// Mints a bearer token for the given user id and prints it to stdout.
fn command_mint_token(command: &MintTokenCommand) -> CliResult<ExitCode> {
    let config = RosterdConfig::load(command.config.as_deref())
        .map_err(|err| CliError::Config(err.to_string()))?;
    let secret = config.auth.secret().map_err(|err| CliError::Config(err.to_string()))?;
    let ttl = command.ttl.unwrap_or(config.auth.token_ttl_seconds);
    let issuer = TokenIssuer::new(secret, ttl);
    let token =
        issuer.issue(UserId::new(command.user)).map_err(|err| CliError::Token(err.to_string()))?;
    write_stdout_line(&token).map_err(|_| CliError::Output("stdout"))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Prints top-level help when no subcommand is given.
fn show_help() -> CliResult<()> {
    Cli::command().print_help().map_err(|_| CliError::Output("stdout"))?;
    write_stdout_line("").map_err(|_| CliError::Output("stdout"))
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message and returns the failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
