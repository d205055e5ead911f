//! missions-web library - HTTP surface for the tutorial missions
//!
//! Exposes `AppState` and `build_router` so integration tests can drive
//! the router directly.

use axum::Router;
use missions_common::{CompletionLedger, MissionConfig, ReferenceArchive};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Immutable mission configuration, loaded once at startup
    pub config: Arc<MissionConfig>,
    /// Canonical tarball and expected extracted bytes for the extraction mission
    pub reference: Arc<ReferenceArchive>,
    /// Idempotent completion records (external collaborator stand-in)
    pub completions: CompletionLedger,
}

impl AppState {
    /// Create new application state
    pub fn new(config: MissionConfig, reference: ReferenceArchive) -> Self {
        Self {
            config: Arc::new(config),
            reference: Arc::new(reference),
            completions: CompletionLedger::new(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/missions/tar/file/:name", get(api::tar_file_download))
        .route("/missions/tar/upload", post(api::tar_upload))
        .route("/missions/tar/extract/download", get(api::extract_download))
        .route("/missions/tar/extract/upload", post(api::extract_upload))
        .route("/missions/status", get(api::mission_status))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
