//! Dossier application binary - composition root.
//!
//! 1. Parse the CLI and load configuration from TOML
//! 2. Initialise tracing
//! 3. Build the embedding backend (mock, or the shared ONNX model)
//! 4. Either serve the HTTP API or analyze local files once

mod cli;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;

use dossier_api::routes;
use dossier_api::state::AppState;
use dossier_core::config::{DossierConfig, EmbeddingConfig};
use dossier_core::error::DossierError;
use dossier_core::types::UploadedDocument;
use dossier_extract::AutoExtractor;
use dossier_insight::InsightEngine;
use dossier_vector::{EmbeddingService, MockEmbedding};

use cli::{CliArgs, Command};

/// Expand ~ to home directory in a path string.
fn expand_home(path: &str) -> PathBuf {
    if path.starts_with("~/") || path.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&path[2..])
    } else {
        PathBuf::from(path)
    }
}

/// Build the configured embedding backend, returning it with its name.
fn build_embedder(
    config: &EmbeddingConfig,
) -> Result<(Arc<dyn EmbeddingService>, &'static str), DossierError> {
    match config.backend.as_str() {
        "mock" => {
            let mock: Arc<dyn EmbeddingService> =
                Arc::new(MockEmbedding::with_dimensions(config.dimensions));
            Ok((mock, "mock"))
        }
        #[cfg(feature = "onnx")]
        "onnx" => {
            let model: Arc<dyn EmbeddingService> =
                dossier_vector::shared_onnx_model(&expand_home(&config.model_dir))?;
            Ok((model, "onnx"))
        }
        #[cfg(not(feature = "onnx"))]
        "onnx" => Err(DossierError::Config(format!(
            "embedding backend \"onnx\" (model {}) requires building with the `onnx` feature",
            expand_home(&config.model_dir).display()
        ))),
        other => Err(DossierError::Config(format!(
            "Unknown embedding backend: {}",
            other
        ))),
    }
}

/// Read documents from disk in order.
///
/// An unreadable file keeps its name and gets no content, so it is listed in
/// the report and contributes no sections.
fn read_documents(paths: &[PathBuf]) -> Vec<UploadedDocument> {
    paths
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            let bytes = std::fs::read(path).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read document");
                Vec::new()
            });
            UploadedDocument::new(name, bytes)
        })
        .collect()
}

fn analyze(
    engine: &InsightEngine,
    persona: &str,
    job: &str,
    files: &[PathBuf],
    output: Option<&Path>,
) -> Result<(), DossierError> {
    let documents = read_documents(files);
    let report = engine.generate(&documents, persona, job);
    let json = report.to_pretty_json()?;

    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(path = %path.display(), "Report written");
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let config = DossierConfig::load_or_default(&config_file);

    // Tracing. RUST_LOG wins over the configured level.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Dossier v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Embedding backend, loaded once and shared by every request.
    let (embedder, backend) = build_embedder(&config.embedding)?;
    tracing::info!(backend, dimensions = embedder.dimensions(), "Embedding backend ready");

    let engine = InsightEngine::new(embedder, Arc::new(AutoExtractor::new()), &config);

    match &args.command {
        Command::Analyze {
            persona,
            job,
            output,
            files,
        } => {
            analyze(&engine, persona, job, files, output.as_deref())?;
        }
        Command::Serve { .. } => {
            let port = args.resolve_port(config.server.port);
            let host = args.resolve_host(&config.server.host);
            let addr = format!("{}:{}", host, port);

            let state = AppState::new(config, engine, backend);
            if let Err(e) = routes::start_server(&addr, state).await {
                tracing::error!(addr = %addr, error = %e, "Server stopped");
                tracing::error!("Try: DOSSIER_PORT={} dossier serve", port.saturating_add(1));
                return Err(e.into());
            }
        }
    }

    Ok(())
}
