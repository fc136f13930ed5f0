// rosterd-config/src/lib.rs
// ============================================================================
// Module: Rosterd Configuration
// Description: Canonical configuration model and validation for Rosterd.
// Purpose: Replace ambient environment state with an explicit config struct.
// Dependencies: rosterd-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits
//! and validated fail-closed at startup. The only environment inputs are
//! `ROSTERD_CONFIG` (config path) and `ROSTERD_AUTH_SECRET` (secret
//! override); everything else is explicit file content.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AUTH_SECRET_ENV_VAR;
pub use config::AuthConfig;
pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::RosterdConfig;
pub use config::ServerConfig;
pub use config::StoreConfig;
pub use config::StoreType;
