//! Per-run memoisation of encodings.
//!
//! The ranker runs once per expanded query over the same section pool, so
//! every title and body would otherwise be encoded four times. The cache lives
//! for a single pipeline run and only stores successful encodings; a failing
//! text is retried (and fails again) on every call, exactly as it would
//! without the cache.

use std::collections::HashMap;
use std::sync::Mutex;

use dossier_core::error::DossierError;
use tracing::debug;

use crate::embedding::EmbeddingService;

/// Memoising wrapper around a borrowed [`EmbeddingService`].
pub struct EmbeddingCache<'a> {
    inner: &'a dyn EmbeddingService,
    vectors: Mutex<HashMap<String, Vec<f32>>>,
}

impl<'a> EmbeddingCache<'a> {
    pub fn new(inner: &'a dyn EmbeddingService) -> Self {
        Self {
            inner,
            vectors: Mutex::new(HashMap::new()),
        }
    }

    /// Number of distinct texts encoded so far.
    pub fn len(&self) -> usize {
        self.vectors.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EmbeddingService for EmbeddingCache<'_> {
    fn encode(&self, text: &str) -> Result<Vec<f32>, DossierError> {
        if let Ok(vectors) = self.vectors.lock() {
            if let Some(hit) = vectors.get(text) {
                return Ok(hit.clone());
            }
        }

        let vector = self.inner.encode(text)?;
        match self.vectors.lock() {
            Ok(mut vectors) => {
                vectors.insert(text.to_string(), vector.clone());
            }
            Err(e) => debug!(error = %e, "Embedding cache lock poisoned, not caching"),
        }
        Ok(vector)
    }

    fn similarity(&self, a: &[f32], b: &[f32]) -> Result<f64, DossierError> {
        self.inner.similarity(a, b)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }
}
