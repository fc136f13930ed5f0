// rosterd-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Position Store
// Description: Durable PositionStore backed by SQLite WAL.
// Purpose: Persist position rows with parameterized CRUD statements.
// Dependencies: rosterd-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`PositionStore`] using `SQLite`. The
//! schema is owned by this crate and versioned through a `store_meta` table;
//! unsupported versions fail closed. Update and delete wrap their existence
//! check and mutation in one transaction so a concurrent delete cannot slip
//! between the check and the write.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use rosterd_core::NewPosition;
use rosterd_core::Position;
use rosterd_core::PositionId;
use rosterd_core::PositionPatch;
use rosterd_core::PositionStore;
use rosterd_core::StoreError;
use rosterd_core::UserId;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Column list shared by every position query.
const POSITION_COLUMNS: &str = "position_id, position_code, position_name, owner_id";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` position store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed position store with WAL support.
#[derive(Clone)]
pub struct SqlitePositionStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqlitePositionStore {
    /// Opens an `SQLite`-backed position store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Locks the shared connection, failing closed on poisoning.
    fn lock_connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))
    }
}

impl PositionStore for SqlitePositionStore {
    fn find_all(&self) -> Result<Vec<Position>, StoreError> {
        let guard = self.lock_connection()?;
        let mut statement = guard
            .prepare(&format!(
                "SELECT {POSITION_COLUMNS} FROM positions ORDER BY position_id"
            ))
            .map_err(db_error)?;
        let rows = statement
            .query_map(params![], row_to_position)
            .map_err(db_error)?
            .collect::<Result<Vec<Position>, _>>()
            .map_err(db_error)?;
        Ok(rows)
    }

    fn find_one(&self, id: PositionId) -> Result<Option<Position>, StoreError> {
        let guard = self.lock_connection()?;
        let row = guard
            .query_row(
                &format!("SELECT {POSITION_COLUMNS} FROM positions WHERE position_id = ?1"),
                params![id.as_i64()],
                row_to_position,
            )
            .optional()
            .map_err(db_error)?;
        Ok(row)
    }

    fn create(&self, input: &NewPosition) -> Result<Position, StoreError> {
        let mut guard = self.lock_connection()?;
        let tx = guard.transaction().map_err(db_error)?;
        tx.execute(
            "INSERT INTO positions (position_code, position_name, owner_id) VALUES (?1, ?2, ?3)",
            params![input.code, input.name, input.owner_id.as_i64()],
        )
        .map_err(db_error)?;
        let inserted_id = tx.last_insert_rowid();
        let row = tx
            .query_row(
                &format!("SELECT {POSITION_COLUMNS} FROM positions WHERE position_id = ?1"),
                params![inserted_id],
                row_to_position,
            )
            .map_err(db_error)?;
        tx.commit().map_err(db_error)?;
        Ok(row)
    }

    fn update(
        &self,
        id: PositionId,
        patch: &PositionPatch,
        owner: UserId,
    ) -> Result<Option<Position>, StoreError> {
        let mut guard = self.lock_connection()?;
        let tx = guard.transaction().map_err(db_error)?;
        let existing = tx
            .query_row(
                &format!("SELECT {POSITION_COLUMNS} FROM positions WHERE position_id = ?1"),
                params![id.as_i64()],
                row_to_position,
            )
            .optional()
            .map_err(db_error)?;
        if existing.is_none() {
            tx.commit().map_err(db_error)?;
            return Ok(None);
        }
        // Absent patch fields fall through to the stored value; the owner
        // stamp is unconditional, including for an empty patch.
        tx.execute(
            "UPDATE positions SET position_code = COALESCE(?2, position_code), position_name = \
             COALESCE(?3, position_name), owner_id = ?4 WHERE position_id = ?1",
            params![id.as_i64(), patch.code, patch.name, owner.as_i64()],
        )
        .map_err(db_error)?;
        let row = tx
            .query_row(
                &format!("SELECT {POSITION_COLUMNS} FROM positions WHERE position_id = ?1"),
                params![id.as_i64()],
                row_to_position,
            )
            .map_err(db_error)?;
        tx.commit().map_err(db_error)?;
        Ok(Some(row))
    }

    fn delete(&self, id: PositionId) -> Result<Option<Position>, StoreError> {
        let mut guard = self.lock_connection()?;
        let tx = guard.transaction().map_err(db_error)?;
        let existing = tx
            .query_row(
                &format!("SELECT {POSITION_COLUMNS} FROM positions WHERE position_id = ?1"),
                params![id.as_i64()],
                row_to_position,
            )
            .optional()
            .map_err(db_error)?;
        let Some(prior) = existing else {
            tx.commit().map_err(db_error)?;
            return Ok(None);
        };
        tx.execute("DELETE FROM positions WHERE position_id = ?1", params![id.as_i64()])
            .map_err(db_error)?;
        tx.commit().map_err(db_error)?;
        Ok(Some(prior))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a rusqlite error into a [`StoreError`].
fn db_error(error: impl std::fmt::Display) -> StoreError {
    StoreError::Store(error.to_string())
}

/// Maps a positions row to the domain entity.
fn row_to_position(row: &rusqlite::Row<'_>) -> rusqlite::Result<Position> {
    Ok(Position {
        position_id: PositionId::new(row.get(0)?),
        position_code: row.get(1)?,
        position_name: row.get(2)?,
        owner_id: UserId::new(row.get(3)?),
    })
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS positions (
                    position_id INTEGER PRIMARY KEY AUTOINCREMENT,
                    position_code TEXT NOT NULL,
                    position_name TEXT NOT NULL,
                    owner_id INTEGER NOT NULL
                );",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}
