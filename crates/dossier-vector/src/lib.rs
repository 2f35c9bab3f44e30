//! Dossier Vector crate - the embedding capability used by the ranker.
//!
//! Provides the `EmbeddingService` trait, a deterministic hashed
//! bag-of-words implementation for tests and offline runs, a per-run
//! memoising wrapper, and (behind the `onnx` feature) a sentence-transformer
//! backend loaded once per process.

pub mod cache;
pub mod embedding;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use cache::EmbeddingCache;
pub use embedding::{cosine_similarity, EmbeddingService, MockEmbedding};
#[cfg(feature = "onnx")]
pub use onnx::{shared_onnx_model, OnnxEmbeddingService};
