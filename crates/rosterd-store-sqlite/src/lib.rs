// rosterd-store-sqlite/src/lib.rs
// ============================================================================
// Module: Rosterd SQLite Store
// Description: Durable PositionStore implementation backed by SQLite.
// Purpose: Persist positions with parameterized statements and WAL support.
// Dependencies: rosterd-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate implements [`rosterd_core::PositionStore`] over `SQLite`. All
//! statements use parameter binding; update and delete run their existence
//! check and mutation inside a single transaction.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::DEFAULT_BUSY_TIMEOUT_MS;
pub use store::SqlitePositionStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
