//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use dossier_core::config::DossierConfig;
use dossier_insight::InsightEngine;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks. The engine
/// is immutable; each request runs its own pipeline.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DossierConfig>,
    pub engine: Arc<InsightEngine>,
    /// Name of the embedding backend, reported by `/health`.
    pub embedding_backend: String,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: DossierConfig, engine: InsightEngine, embedding_backend: impl Into<String>) -> Self {
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
            embedding_backend: embedding_backend.into(),
            start_time: Instant::now(),
        }
    }
}
