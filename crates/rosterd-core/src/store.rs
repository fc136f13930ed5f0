// rosterd-core/src/store.rs
// ============================================================================
// Module: Position Store Contract
// Description: Persistence trait, store errors, and in-memory implementation.
// Purpose: Provide the repository seam between handlers and storage backends.
// Dependencies: crate::position, thiserror
// ============================================================================

//! ## Overview
//! [`PositionStore`] is the repository contract for the positions table.
//! Absent rows are `Ok(None)`, never errors; update and delete perform an
//! existence check first and leave the table untouched when the row is
//! missing. The in-memory implementation here serves tests and the `memory`
//! store type.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use thiserror::Error;

use crate::position::NewPosition;
use crate::position::Position;
use crate::position::PositionId;
use crate::position::PositionPatch;
use crate::position::UserId;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Position store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("position store io error: {0}")]
    Io(String),
    /// Store data version is incompatible.
    #[error("position store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("position store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("position store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Store Trait
// ============================================================================

/// Repository contract for the positions table.
pub trait PositionStore: Send + Sync {
    /// Returns every position in `position_id` order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails. An empty table is
    /// `Ok(vec![])`.
    fn find_all(&self) -> Result<Vec<Position>, StoreError>;

    /// Returns the position with the given identifier, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn find_one(&self, id: PositionId) -> Result<Option<Position>, StoreError>;

    /// Inserts a new position and returns the freshly read row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the insert fails.
    fn create(&self, input: &NewPosition) -> Result<Position, StoreError>;

    /// Applies a partial update plus an owner re-stamp.
    ///
    /// Only fields present in `patch` change; `owner_id` is always set to
    /// `owner`, including for an empty patch. Returns `None` without writing
    /// when the row is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the update fails.
    fn update(
        &self,
        id: PositionId,
        patch: &PositionPatch,
        owner: UserId,
    ) -> Result<Option<Position>, StoreError>;

    /// Deletes a position and returns the prior row, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn delete(&self, id: PositionId) -> Result<Option<Position>, StoreError>;
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared position store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedPositionStore {
    /// Inner store implementation.
    inner: Arc<dyn PositionStore>,
}

impl SharedPositionStore {
    /// Wraps a position store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl PositionStore + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn PositionStore>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl PositionStore for SharedPositionStore {
    fn find_all(&self) -> Result<Vec<Position>, StoreError> {
        self.inner.find_all()
    }

    fn find_one(&self, id: PositionId) -> Result<Option<Position>, StoreError> {
        self.inner.find_one(id)
    }

    fn create(&self, input: &NewPosition) -> Result<Position, StoreError> {
        self.inner.create(input)
    }

    fn update(
        &self,
        id: PositionId,
        patch: &PositionPatch,
        owner: UserId,
    ) -> Result<Option<Position>, StoreError> {
        self.inner.update(id, patch, owner)
    }

    fn delete(&self, id: PositionId) -> Result<Option<Position>, StoreError> {
        self.inner.delete(id)
    }
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory position store for tests and the `memory` store type.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPositionStore {
    /// Row map and id counter protected by a mutex.
    state: Arc<Mutex<InMemoryState>>,
}

/// Mutable state of the in-memory store.
#[derive(Debug, Default)]
struct InMemoryState {
    /// Last assigned position identifier.
    last_id: i64,
    /// Rows keyed by position identifier.
    rows: BTreeMap<i64, Position>,
}

impl InMemoryPositionStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PositionStore for InMemoryPositionStore {
    fn find_all(&self) -> Result<Vec<Position>, StoreError> {
        let guard = lock_state(&self.state)?;
        Ok(guard.rows.values().cloned().collect())
    }

    fn find_one(&self, id: PositionId) -> Result<Option<Position>, StoreError> {
        let guard = lock_state(&self.state)?;
        Ok(guard.rows.get(&id.as_i64()).cloned())
    }

    fn create(&self, input: &NewPosition) -> Result<Position, StoreError> {
        let mut guard = lock_state(&self.state)?;
        let next_id = guard
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Store("position id overflow".to_string()))?;
        guard.last_id = next_id;
        let row = Position {
            position_id: PositionId::new(next_id),
            position_code: input.code.clone(),
            position_name: input.name.clone(),
            owner_id: input.owner_id,
        };
        guard.rows.insert(next_id, row.clone());
        Ok(row)
    }

    fn update(
        &self,
        id: PositionId,
        patch: &PositionPatch,
        owner: UserId,
    ) -> Result<Option<Position>, StoreError> {
        let mut guard = lock_state(&self.state)?;
        let Some(row) = guard.rows.get_mut(&id.as_i64()) else {
            return Ok(None);
        };
        if let Some(code) = &patch.code {
            row.position_code = code.clone();
        }
        if let Some(name) = &patch.name {
            row.position_name = name.clone();
        }
        row.owner_id = owner;
        Ok(Some(row.clone()))
    }

    fn delete(&self, id: PositionId) -> Result<Option<Position>, StoreError> {
        let mut guard = lock_state(&self.state)?;
        Ok(guard.rows.remove(&id.as_i64()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Locks the in-memory state, failing closed on poisoning.
fn lock_state(
    state: &Arc<Mutex<InMemoryState>>,
) -> Result<std::sync::MutexGuard<'_, InMemoryState>, StoreError> {
    state.lock().map_err(|_| StoreError::Store("position store mutex poisoned".to_string()))
}
