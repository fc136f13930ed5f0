// rosterd-core/src/position.rs
// ============================================================================
// Module: Position Entity
// Description: Position entity, identifiers, and write-side input shapes.
// Purpose: Provide strongly typed rows and validated create/update inputs.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A `Position` is one row of the positions table. Identifiers are opaque
//! integer newtypes that serialize transparently. Create and update inputs
//! carry their own length validation; `owner_id` is an audit stamp recording
//! the acting user at last write, not an access-control field.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum length of a position code in bytes.
pub const MAX_POSITION_CODE_LENGTH: usize = 64;
/// Maximum length of a position name in bytes.
pub const MAX_POSITION_NAME_LENGTH: usize = 256;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Store-assigned position identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionId(i64);

impl PositionId {
    /// Creates a position identifier from a raw integer.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the identifier as a raw integer.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for PositionId {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

/// Identifier of the acting user stamped onto writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a user identifier from a raw integer.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the identifier as a raw integer.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Entity
// ============================================================================

/// One row of the positions table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Store-assigned identifier, immutable for the row's lifetime.
    pub position_id: PositionId,
    /// Position code.
    pub position_code: String,
    /// Position display name.
    pub position_name: String,
    /// Acting user at last write (audit stamp, no access-control meaning).
    pub owner_id: UserId,
}

// ============================================================================
// SECTION: Write Inputs
// ============================================================================

/// Input for creating a position.
#[derive(Debug, Clone)]
pub struct NewPosition {
    /// Position code.
    pub code: String,
    /// Position display name.
    pub name: String,
    /// Creating user identifier.
    pub owner_id: UserId,
}

impl NewPosition {
    /// Validates field presence and length limits.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] when a field is empty or exceeds its limit.
    pub fn validate(&self) -> Result<(), InputError> {
        validate_code(&self.code)?;
        validate_name(&self.name)
    }
}

/// Partial update for a position. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PositionPatch {
    /// Replacement position code, when supplied.
    pub code: Option<String>,
    /// Replacement position name, when supplied.
    pub name: Option<String>,
}

impl PositionPatch {
    /// Returns true when the patch carries no data fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.code.is_none() && self.name.is_none()
    }

    /// Validates any supplied fields against length limits.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] when a supplied field is empty or exceeds its
    /// limit.
    pub fn validate(&self) -> Result<(), InputError> {
        if let Some(code) = &self.code {
            validate_code(code)?;
        }
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Invalid write-side input.
#[derive(Debug, Error)]
pub enum InputError {
    /// A field failed presence or length validation.
    #[error("invalid position input: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a position code value.
fn validate_code(code: &str) -> Result<(), InputError> {
    if code.is_empty() {
        return Err(InputError::Invalid("code must not be empty".to_string()));
    }
    if code.len() > MAX_POSITION_CODE_LENGTH {
        return Err(InputError::Invalid(format!(
            "code exceeds {MAX_POSITION_CODE_LENGTH} bytes"
        )));
    }
    Ok(())
}

/// Validates a position name value.
fn validate_name(name: &str) -> Result<(), InputError> {
    if name.is_empty() {
        return Err(InputError::Invalid("name must not be empty".to_string()));
    }
    if name.len() > MAX_POSITION_NAME_LENGTH {
        return Err(InputError::Invalid(format!(
            "name exceeds {MAX_POSITION_NAME_LENGTH} bytes"
        )));
    }
    Ok(())
}
