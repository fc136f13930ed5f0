// rosterd-http/src/lib.rs
// ============================================================================
// Module: Rosterd HTTP
// Description: HTTP surface for the positions service.
// Purpose: Expose position CRUD and the greeting route over axum.
// Dependencies: axum, jsonwebtoken, rosterd-core, rosterd-config, tokio
// ============================================================================

//! ## Overview
//! This crate wires the position store to an axum router. Read routes are
//! public; mutating routes require a verified bearer token and stamp the
//! acting user onto the row as `owner_id`. All not-found outcomes surface as
//! structured 404 responses.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod handlers;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::AuthAuditEvent;
pub use auth::AuthAuditSink;
pub use auth::AuthError;
pub use auth::AuthenticatedUser;
pub use auth::Claims;
pub use auth::NoopAuditSink;
pub use auth::StderrAuditSink;
pub use auth::TokenIssuer;
pub use auth::TokenVerifier;
pub use handlers::ApiError;
pub use handlers::Envelope;
pub use server::AppState;
pub use server::HttpServer;
pub use server::ServerError;
pub use server::router;
