//! Dossier API crate - axum HTTP service for insight generation.
//!
//! Exposes `POST /generate-insights` (multipart upload of documents plus
//! persona and job) and `GET /health`.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
