//! Router setup with all API routes and middleware.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use dossier_core::error::DossierError;

use crate::handlers;
use crate::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
///
/// Only `/generate-insights` is rate limited. The body limit comes from
/// `server.max_upload_bytes`.
pub fn create_router(state: AppState) -> Router {
    let limiter = RateLimiter::new(state.config.server.requests_per_sec);
    let body_limit = state.config.server.max_upload_bytes;

    let insight_routes = Router::new()
        .route("/generate-insights", post(handlers::generate_insights))
        .layer(axum::middleware::from_fn(rate_limit_middleware))
        .layer(axum::Extension(limiter));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(insight_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve the router until the process stops.
pub async fn start_server(addr: &str, state: AppState) -> Result<(), DossierError> {
    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| DossierError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| DossierError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
