// rosterd-core/src/lib.rs
// ============================================================================
// Module: Rosterd Core
// Description: Domain model and store contract for the positions service.
// Purpose: Provide typed entities and the PositionStore persistence seam.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Rosterd core defines the `Position` entity, its input shapes, and the
//! [`PositionStore`] trait that persistence backends implement. The in-memory
//! store included here backs tests and the `memory` store type; durable
//! persistence lives in `rosterd-store-sqlite`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod position;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use position::InputError;
pub use position::NewPosition;
pub use position::Position;
pub use position::PositionId;
pub use position::PositionPatch;
pub use position::UserId;
pub use store::InMemoryPositionStore;
pub use store::PositionStore;
pub use store::SharedPositionStore;
pub use store::StoreError;
