//! Route handler functions for all API endpoints.

use std::sync::Arc;

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use dossier_core::types::UploadedDocument;

use crate::error::ApiError;
use crate::state::AppState;

/// Multipart field carrying an uploaded document. Repeatable.
pub const DOCUMENT_FIELD: &str = "pdfs";
pub const PERSONA_FIELD: &str = "persona";
pub const JOB_FIELD: &str = "job";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub embedding_backend: String,
}

/// Parsed `/generate-insights` form. Missing text fields are empty.
#[derive(Debug, Default)]
pub struct InsightForm {
    pub documents: Vec<UploadedDocument>,
    pub persona: String,
    pub job: String,
}

/// Read the multipart form, keeping documents in upload order.
async fn read_form(multipart: &mut Multipart) -> Result<InsightForm, ApiError> {
    let mut form = InsightForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            DOCUMENT_FIELD => {
                let file_name = match field.file_name() {
                    Some(f) if !f.is_empty() => f.to_string(),
                    _ => format!("document-{}", form.documents.len() + 1),
                };
                let bytes = field.bytes().await?;
                debug!(document = %file_name, bytes = bytes.len(), "Received document");
                form.documents.push(UploadedDocument::new(file_name, bytes.to_vec()));
            }
            PERSONA_FIELD => form.persona = field.text().await?,
            JOB_FIELD => form.job = field.text().await?,
            other => debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

/// POST /generate-insights - rank uploaded documents for a persona and job.
///
/// The pipeline is CPU-bound and runs on the blocking pool. The body is the
/// report rendered with 4-space indentation.
pub async fn generate_insights(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let mut multipart = multipart?;
    let form = read_form(&mut multipart).await?;
    info!(
        documents = form.documents.len(),
        persona = %form.persona,
        "Generating insights"
    );

    let engine = Arc::clone(&state.engine);
    let report = tokio::task::spawn_blocking(move || {
        engine.generate(&form.documents, &form.persona, &form.job)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Insight task failed: {}", e)))?;

    let body = report.to_pretty_json()?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// GET /health - liveness and backend info.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        embedding_backend: state.embedding_backend.clone(),
    })
}
