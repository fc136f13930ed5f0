// rosterd-config/src/config.rs
// ============================================================================
// Module: Rosterd Configuration
// Description: Configuration loading and validation for Rosterd.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: rosterd-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed: the server refuses to start
//! without a usable auth secret rather than falling back to a baked-in value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use rosterd_store_sqlite::DEFAULT_BUSY_TIMEOUT_MS;
use rosterd_store_sqlite::SqliteStoreMode;
use rosterd_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "rosterd.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "ROSTERD_CONFIG";
/// Environment variable overriding the auth secret.
pub const AUTH_SECRET_ENV_VAR: &str = "ROSTERD_AUTH_SECRET";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default HTTP bind address.
const DEFAULT_BIND: &str = "127.0.0.1:5000";
/// Default maximum request body size in bytes.
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
/// Minimum allowed request body limit in bytes.
pub(crate) const MIN_MAX_BODY_BYTES: usize = 1024;
/// Maximum allowed request body limit in bytes.
pub(crate) const MAX_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
/// Default store call timeout in milliseconds.
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
/// Minimum allowed store call timeout in milliseconds.
pub(crate) const MIN_STORE_TIMEOUT_MS: u64 = 100;
/// Maximum allowed store call timeout in milliseconds.
pub(crate) const MAX_STORE_TIMEOUT_MS: u64 = 60_000;
/// Minimum allowed auth secret length in bytes.
pub(crate) const MIN_AUTH_SECRET_LENGTH: usize = 16;
/// Maximum allowed auth secret length in bytes.
pub(crate) const MAX_AUTH_SECRET_LENGTH: usize = 512;
/// Default bearer token lifetime in seconds.
const DEFAULT_TOKEN_TTL_SECONDS: u64 = 900;
/// Minimum allowed token lifetime in seconds.
pub(crate) const MIN_TOKEN_TTL_SECONDS: u64 = 30;
/// Maximum allowed token lifetime in seconds.
pub(crate) const MAX_TOKEN_TTL_SECONDS: u64 = 86_400;
/// Minimum allowed `SQLite` busy timeout in milliseconds.
pub(crate) const MIN_BUSY_TIMEOUT_MS: u64 = 100;
/// Maximum allowed `SQLite` busy timeout in milliseconds.
pub(crate) const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Rosterd service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterdConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Bearer token verification configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Position store configuration.
    #[serde(default)]
    pub store: StoreConfig,
}

impl RosterdConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        if let Ok(secret) = env::var(AUTH_SECRET_ENV_VAR)
            && !secret.is_empty()
        {
            config.auth.secret = Some(secret);
        }
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.auth.validate()?;
        self.store.validate()?;
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum allowed request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Bound on each store call issued by a handler, in milliseconds.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl ServerConfig {
    /// Validates server settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a setting is out of bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid("server.bind must be a socket address".to_string()))?;
        if self.max_body_bytes < MIN_MAX_BODY_BYTES || self.max_body_bytes > MAX_MAX_BODY_BYTES {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes must be between {MIN_MAX_BODY_BYTES} and \
                 {MAX_MAX_BODY_BYTES}"
            )));
        }
        if self.store_timeout_ms < MIN_STORE_TIMEOUT_MS
            || self.store_timeout_ms > MAX_STORE_TIMEOUT_MS
        {
            return Err(ConfigError::Invalid(format!(
                "server.store_timeout_ms must be between {MIN_STORE_TIMEOUT_MS} and \
                 {MAX_STORE_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

/// Bearer token verification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret. Required; `ROSTERD_AUTH_SECRET` overrides.
    #[serde(default)]
    pub secret: Option<String>,
    /// Token lifetime in seconds for issued tokens.
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }
}

impl AuthConfig {
    /// Returns the configured secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no secret is configured.
    pub fn secret(&self) -> Result<&str, ConfigError> {
        self.secret
            .as_deref()
            .ok_or_else(|| ConfigError::Invalid("auth.secret is required".to_string()))
    }

    /// Validates auth settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the secret is missing or out of bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secret = self.secret()?;
        if secret.len() < MIN_AUTH_SECRET_LENGTH || secret.len() > MAX_AUTH_SECRET_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "auth.secret must be between {MIN_AUTH_SECRET_LENGTH} and \
                 {MAX_AUTH_SECRET_LENGTH} bytes"
            )));
        }
        if self.token_ttl_seconds < MIN_TOKEN_TTL_SECONDS
            || self.token_ttl_seconds > MAX_TOKEN_TTL_SECONDS
        {
            return Err(ConfigError::Invalid(format!(
                "auth.token_ttl_seconds must be between {MIN_TOKEN_TTL_SECONDS} and \
                 {MAX_TOKEN_TTL_SECONDS}"
            )));
        }
        Ok(())
    }
}

/// Position store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// In-memory store; contents are lost on restart.
    #[default]
    Memory,
    /// Durable `SQLite` store.
    Sqlite,
}

/// Position store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// Path to the `SQLite` database file (required for `sqlite`).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// `SQLite` busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::Memory,
            path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Validates store settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when settings are inconsistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_type == StoreType::Sqlite && self.path.is_none() {
            return Err(ConfigError::Invalid("store.path is required for sqlite".to_string()));
        }
        if self.busy_timeout_ms < MIN_BUSY_TIMEOUT_MS || self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS
        {
            return Err(ConfigError::Invalid(format!(
                "store.busy_timeout_ms must be between {MIN_BUSY_TIMEOUT_MS} and \
                 {MAX_BUSY_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Returns the default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Returns the default request body limit.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Returns the default store call timeout.
const fn default_store_timeout_ms() -> u64 {
    DEFAULT_STORE_TIMEOUT_MS
}

/// Returns the default token lifetime.
const fn default_token_ttl_seconds() -> u64 {
    DEFAULT_TOKEN_TTL_SECONDS
}

/// Returns the default `SQLite` busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Path Resolution
// ============================================================================

/// Resolves the config path from argument, environment, or default.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(value) = env::var(CONFIG_ENV_VAR)
        && !value.is_empty()
    {
        return Ok(PathBuf::from(value));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates config paths for safety limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(
                "config path contains an overlong component".to_string(),
            ));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// Config file could not be parsed.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Config content failed validation.
    #[error("config invalid: {0}")]
    Invalid(String),
}
