// rosterd-http/src/server.rs
// ============================================================================
// Module: HTTP Server
// Description: Router construction and server lifecycle for Rosterd.
// Purpose: Build the position store from config and serve the HTTP surface.
// Dependencies: axum, rosterd-config, rosterd-core, rosterd-store-sqlite, tokio
// ============================================================================

//! ## Overview
//! The HTTP server binds the configured address and routes requests to the
//! position handlers. The store backend is chosen from configuration: the
//! durable `SQLite` store for production, the in-memory store for tests and
//! throwaway runs (a startup warning is emitted for the latter).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use rosterd_config::RosterdConfig;
use rosterd_config::StoreType;
use rosterd_core::InMemoryPositionStore;
use rosterd_core::SharedPositionStore;
use rosterd_store_sqlite::SqlitePositionStore;
use rosterd_store_sqlite::SqliteStoreConfig;
use thiserror::Error;

use crate::auth::AuthAuditSink;
use crate::auth::StderrAuditSink;
use crate::auth::TokenVerifier;
use crate::handlers::create_position;
use crate::handlers::delete_position;
use crate::handlers::get_position;
use crate::handlers::greeting;
use crate::handlers::list_positions;
use crate::handlers::update_position;

// ============================================================================
// SECTION: Server State
// ============================================================================

/// Shared state threaded through every handler.
pub struct AppState {
    /// Position store handle.
    pub store: SharedPositionStore,
    /// Bearer token verifier for mutating routes.
    pub verifier: TokenVerifier,
    /// Audit sink for auth decisions.
    pub audit: Arc<dyn AuthAuditSink>,
    /// Bound applied to each store call.
    pub store_timeout: Duration,
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the Rosterd router over the given state.
#[must_use]
pub fn router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(greeting))
        .route("/positions", get(list_positions).post(create_position))
        .route(
            "/positions/{id}",
            get(get_position).put(update_position).delete(delete_position),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Rosterd HTTP server instance.
pub struct HttpServer {
    /// Validated service configuration.
    config: RosterdConfig,
    /// Shared handler state.
    state: Arc<AppState>,
}

impl HttpServer {
    /// Builds a server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration is invalid or the store
    /// cannot be initialized.
    pub fn from_config(config: RosterdConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let store = build_position_store(&config)?;
        let secret = config.auth.secret().map_err(|err| ServerError::Config(err.to_string()))?;
        let verifier = TokenVerifier::new(secret);
        let state = Arc::new(AppState {
            store,
            verifier,
            audit: Arc::new(StderrAuditSink),
            store_timeout: Duration::from_millis(config.server.store_timeout_ms),
        });
        emit_memory_store_warning(&config);
        Ok(Self {
            config,
            state,
        })
    }

    /// Serves requests until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr: SocketAddr = self
            .config
            .server
            .bind
            .parse()
            .map_err(|_| ServerError::Config("invalid bind address".to_string()))?;
        let app = router(self.state, self.config.server.max_body_bytes);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|_| ServerError::Transport("http bind failed".to_string()))?;
        axum::serve(listener, app)
            .await
            .map_err(|_| ServerError::Transport("http server failed".to_string()))
    }
}

/// Builds the position store from service configuration.
fn build_position_store(config: &RosterdConfig) -> Result<SharedPositionStore, ServerError> {
    let store = match config.store.store_type {
        StoreType::Memory => SharedPositionStore::from_store(InMemoryPositionStore::new()),
        StoreType::Sqlite => {
            let path = config
                .store
                .path
                .clone()
                .ok_or_else(|| ServerError::Config("sqlite store requires path".to_string()))?;
            let sqlite_config = SqliteStoreConfig {
                path,
                busy_timeout_ms: config.store.busy_timeout_ms,
                journal_mode: config.store.journal_mode,
                sync_mode: config.store.sync_mode,
            };
            let store = SqlitePositionStore::new(sqlite_config)
                .map_err(|err| ServerError::Init(err.to_string()))?;
            SharedPositionStore::from_store(store)
        }
    };
    Ok(store)
}

/// Warns when the non-durable memory store is selected.
#[allow(clippy::print_stderr, reason = "Startup warning emitted on stderr.")]
fn emit_memory_store_warning(config: &RosterdConfig) {
    if config.store.store_type == StoreType::Memory {
        eprintln!(
            "rosterd: WARNING: running with the in-memory store; positions are lost on restart. \
             Configure store.type = \"sqlite\" for durability."
        );
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
