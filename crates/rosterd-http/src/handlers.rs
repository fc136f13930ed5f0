// rosterd-http/src/handlers.rs
// ============================================================================
// Module: Position Endpoint Handlers
// Description: HTTP handlers for position CRUD and the greeting route.
// Purpose: Validate requests, enforce auth on mutations, shape responses.
// Dependencies: axum, rosterd-core, serde
// ============================================================================

//! ## Overview
//! Each handler follows the same pipeline: authenticate (mutating routes
//! only), validate the path id and body, run the store call off the async
//! workers with a bounded timeout, and wrap the result in the
//! `{message, data}` envelope. Absent rows surface as structured 404
//! responses for read-one, update, and delete alike.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Json;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::IntoResponse;
use axum::response::Response;
use rosterd_core::NewPosition;
use rosterd_core::Position;
use rosterd_core::PositionId;
use rosterd_core::PositionPatch;
use rosterd_core::PositionStore;
use rosterd_core::SharedPositionStore;
use rosterd_core::StoreError;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthAuditEvent;
use crate::auth::AuthenticatedUser;
use crate::server::AppState;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Greeting served on the root route.
const GREETING: &str = "Hello there! How are you?";
/// Success message for the list route.
const MSG_LISTED: &str = "All positions retrieved successfully!";
/// Success message for the read-one route.
const MSG_RETRIEVED: &str = "Position retrieved successfully!";
/// Success message for the create route.
const MSG_CREATED: &str = "Position created successfully!";
/// Success message for the update route.
const MSG_UPDATED: &str = "Position updated successfully!";

// ============================================================================
// SECTION: Response Shapes
// ============================================================================

/// Envelope applied to every successful response.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Human-readable outcome message.
    pub message: String,
    /// Response payload.
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wraps a payload with an outcome message.
    #[must_use]
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// Uniform error body for failed requests.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Error detail payload.
    error: ErrorDetail,
}

/// Error detail carried by [`ErrorBody`].
#[derive(Debug, Serialize)]
struct ErrorDetail {
    /// Stable machine-readable error code.
    code: &'static str,
    /// Human-readable error message.
    message: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Request-level errors surfaced to clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid bearer credential.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    /// Request shape failed validation.
    #[error("invalid request: {0}")]
    Validation(String),
    /// No row matches the requested id.
    #[error("not found: {0}")]
    NotFound(String),
    /// Store operation failed.
    #[error("store error: {0}")]
    Store(String),
    /// Store call exceeded the configured timeout.
    #[error("store call timed out")]
    Timeout,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Unauthenticated(message) => {
                (StatusCode::UNAUTHORIZED, "unauthenticated", message)
            }
            Self::Validation(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            Self::Store(message) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error", message),
            Self::Timeout => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_timeout",
                "store call timed out".to_string(),
            ),
        };
        (
            status,
            Json(ErrorBody {
                error: ErrorDetail {
                    code,
                    message,
                },
            }),
        )
            .into_response()
    }
}

// ============================================================================
// SECTION: Request Bodies
// ============================================================================

/// Body for `POST /positions`.
#[derive(Debug, Deserialize)]
pub(crate) struct CreatePositionBody {
    /// Position code.
    code: String,
    /// Position display name.
    name: String,
}

/// Body for `PUT /positions/{id}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct UpdatePositionBody {
    /// Replacement position code, when supplied.
    code: Option<String>,
    /// Replacement position name, when supplied.
    name: Option<String>,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `GET /` greeting route.
pub(crate) async fn greeting() -> &'static str {
    GREETING
}

/// `GET /positions` returns every position.
pub(crate) async fn list_positions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<Vec<Position>>>, ApiError> {
    let rows = run_store(&state, |store| store.find_all()).await?;
    Ok(Json(Envelope::new(MSG_LISTED, rows)))
}

/// `GET /positions/{id}` returns one position or 404.
pub(crate) async fn get_position(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Envelope<Position>>, ApiError> {
    let id = parse_position_id(&raw_id)?;
    let row = run_store(&state, move |store| store.find_one(id)).await?;
    let position = row.ok_or_else(|| not_found(id))?;
    Ok(Json(Envelope::new(MSG_RETRIEVED, position)))
}

/// `POST /positions` creates a position for the authenticated caller.
pub(crate) async fn create_position(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreatePositionBody>,
) -> Result<(StatusCode, Json<Envelope<Position>>), ApiError> {
    let user = authenticate(&state, &headers, "POST", "/positions")?;
    let input = NewPosition {
        code: body.code,
        name: body.name,
        owner_id: user.user_id,
    };
    input.validate().map_err(|err| ApiError::Validation(err.to_string()))?;
    let created = run_store(&state, move |store| store.create(&input)).await?;
    Ok((StatusCode::CREATED, Json(Envelope::new(MSG_CREATED, created))))
}

/// `PUT /positions/{id}` applies a partial update and re-stamps the owner.
pub(crate) async fn update_position(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdatePositionBody>,
) -> Result<Json<Envelope<Position>>, ApiError> {
    let user = authenticate(&state, &headers, "PUT", "/positions/{id}")?;
    let id = parse_position_id(&raw_id)?;
    let patch = PositionPatch {
        code: body.code,
        name: body.name,
    };
    patch.validate().map_err(|err| ApiError::Validation(err.to_string()))?;
    let owner = user.user_id;
    let row = run_store(&state, move |store| store.update(id, &patch, owner)).await?;
    let updated = row.ok_or_else(|| not_found(id))?;
    Ok(Json(Envelope::new(MSG_UPDATED, updated)))
}

/// `DELETE /positions/{id}` removes a position and returns the prior row.
pub(crate) async fn delete_position(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Envelope<Position>>, ApiError> {
    authenticate(&state, &headers, "DELETE", "/positions/{id}")?;
    let id = parse_position_id(&raw_id)?;
    let row = run_store(&state, move |store| store.delete(id)).await?;
    let prior = row.ok_or_else(|| not_found(id))?;
    Ok(Json(Envelope::new(format!("Position ID {id} deleted successfully!"), prior)))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves and audits the acting user for a mutating route.
fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
    method: &'static str,
    route: &'static str,
) -> Result<AuthenticatedUser, ApiError> {
    let header = headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok());
    match state.verifier.verify_header(header) {
        Ok(user) => {
            state.audit.record(&AuthAuditEvent::allowed(method, route, &user));
            Ok(user)
        }
        Err(error) => {
            state.audit.record(&AuthAuditEvent::denied(method, route, &error));
            Err(ApiError::Unauthenticated(error.to_string()))
        }
    }
}

/// Parses a path segment into a position identifier.
fn parse_position_id(raw: &str) -> Result<PositionId, ApiError> {
    raw.parse::<i64>()
        .map(PositionId::new)
        .map_err(|_| ApiError::Validation("position id must be an integer".to_string()))
}

/// Builds the uniform not-found error for a position id.
fn not_found(id: PositionId) -> ApiError {
    ApiError::NotFound(format!("position {id} not found"))
}

/// Runs a store call off the async workers, bounded by the configured timeout.
async fn run_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&SharedPositionStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = state.store.clone();
    let join = tokio::task::spawn_blocking(move || op(&store));
    match tokio::time::timeout(state.store_timeout, join).await {
        Err(_) => Err(ApiError::Timeout),
        Ok(Err(_)) => Err(ApiError::Store("store task failed".to_string())),
        Ok(Ok(result)) => result.map_err(|err| ApiError::Store(err.to_string())),
    }
}
