// rosterd-http/src/auth.rs
// ============================================================================
// Module: Bearer Token Auth
// Description: Bearer token verification, issuance, and auth audit events.
// Purpose: Provide strict, fail-closed identity resolution for mutating routes.
// Dependencies: jsonwebtoken, rosterd-core, serde
// ============================================================================

//! ## Overview
//! Mutating routes resolve the acting user from an `Authorization: Bearer`
//! header carrying an HS256 JWT. Verification is fail-closed: oversized
//! headers, wrong schemes, bad signatures, and expired tokens are all
//! rejected before any store access. Every decision emits an audit event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use rosterd_core::UserId;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted `Authorization` header size.
const MAX_AUTH_HEADER_BYTES: usize = 8 * 1024;

// ============================================================================
// SECTION: Claims
// ============================================================================

/// JWT claims carried by bearer tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Acting user identifier.
    pub sub: i64,
    /// Issued-at time (unix seconds).
    pub iat: u64,
    /// Expiry time (unix seconds).
    pub exp: u64,
}

/// Authenticated caller context, scoped to one request.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    /// Acting user identifier resolved from the token.
    pub user_id: UserId,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Bearer token errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or invalid bearer credential.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    /// Token issuance failed.
    #[error("token issuance failed: {0}")]
    Issuance(String),
}

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// Verifies bearer tokens against the configured HS256 secret.
pub struct TokenVerifier {
    /// Decoding key derived from the shared secret.
    decoding: DecodingKey,
    /// Validation settings (HS256, exp enforced with zero leeway).
    validation: Validation,
}

impl TokenVerifier {
    /// Builds a verifier from the shared secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Resolves the acting user from an `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] when the header is missing,
    /// malformed, oversized, or carries an invalid or expired token.
    pub fn verify_header(&self, header: Option<&str>) -> Result<AuthenticatedUser, AuthError> {
        let token = parse_bearer_token(header)?;
        let data = decode::<Claims>(&token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => {
                    AuthError::Unauthenticated("token expired".to_string())
                }
                _ => AuthError::Unauthenticated("invalid bearer token".to_string()),
            }
        })?;
        Ok(AuthenticatedUser {
            user_id: UserId::new(data.claims.sub),
        })
    }
}

// ============================================================================
// SECTION: Issuer
// ============================================================================

/// Issues bearer tokens for out-of-band credential flows and tests.
pub struct TokenIssuer {
    /// Encoding key derived from the shared secret.
    encoding: EncodingKey,
    /// Token lifetime in seconds.
    ttl_seconds: u64,
}

impl TokenIssuer {
    /// Builds an issuer from the shared secret and token lifetime.
    #[must_use]
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        }
    }

    /// Issues a token for the given user, valid for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Issuance`] when encoding fails.
    pub fn issue(&self, user_id: UserId) -> Result<String, AuthError> {
        let now = unix_seconds();
        let claims = Claims {
            sub: user_id.as_i64(),
            iat: now,
            exp: now.saturating_add(self.ttl_seconds),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| AuthError::Issuance(err.to_string()))
    }
}

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// Auth audit event payload.
#[derive(Debug, Serialize)]
pub struct AuthAuditEvent {
    /// Event identifier.
    event: &'static str,
    /// Decision outcome.
    decision: &'static str,
    /// HTTP method of the guarded request.
    method: &'static str,
    /// Route of the guarded request.
    route: &'static str,
    /// Acting user identifier (for allow events).
    user_id: Option<i64>,
    /// Failure reason (for deny events).
    reason: Option<String>,
}

impl AuthAuditEvent {
    /// Builds an allow event.
    #[must_use]
    pub fn allowed(method: &'static str, route: &'static str, user: &AuthenticatedUser) -> Self {
        Self {
            event: "position_write_authz",
            decision: "allow",
            method,
            route,
            user_id: Some(user.user_id.as_i64()),
            reason: None,
        }
    }

    /// Builds a deny event.
    #[must_use]
    pub fn denied(method: &'static str, route: &'static str, error: &AuthError) -> Self {
        Self {
            event: "position_write_authz",
            decision: "deny",
            method,
            route,
            user_id: None,
            reason: Some(error.to_string()),
        }
    }
}

/// Audit sink for auth decisions.
pub trait AuthAuditSink: Send + Sync {
    /// Record an auth audit event.
    fn record(&self, event: &AuthAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuthAuditSink for StderrAuditSink {
    #[allow(clippy::print_stderr, reason = "Audit sink emits JSON lines on stderr.")]
    fn record(&self, event: &AuthAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            eprintln!("{payload}");
        }
    }
}

/// No-op audit sink for tests.
pub struct NoopAuditSink;

impl AuthAuditSink for NoopAuditSink {
    fn record(&self, _event: &AuthAuditEvent) {}
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Extracts the token from a bearer `Authorization` header value.
fn parse_bearer_token(auth_header: Option<&str>) -> Result<String, AuthError> {
    let header = auth_header
        .ok_or_else(|| AuthError::Unauthenticated("missing authorization".to_string()))?;
    if header.len() > MAX_AUTH_HEADER_BYTES {
        return Err(AuthError::Unauthenticated("authorization header too large".to_string()));
    }
    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default().trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::Unauthenticated("invalid authorization header".to_string()));
    }
    Ok(token.to_string())
}

/// Returns the current unix epoch in seconds.
fn unix_seconds() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}
