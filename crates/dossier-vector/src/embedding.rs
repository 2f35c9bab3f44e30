//! Embedding service trait and the deterministic mock implementation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use dossier_core::error::DossierError;

/// Service for turning text into fixed-length vectors and comparing them.
///
/// Calls are independent of each other; a failure in one call must not
/// poison later calls. Implementations are loaded once and reused for every
/// request, so they only need to be safe for sequential reuse across threads.
pub trait EmbeddingService: Send + Sync {
    /// Generate an embedding vector for the given text.
    fn encode(&self, text: &str) -> Result<Vec<f32>, DossierError>;

    /// Similarity between two vectors produced by [`encode`](Self::encode).
    ///
    /// Defaults to cosine similarity, bounded to [-1, 1].
    fn similarity(&self, a: &[f32], b: &[f32]) -> Result<f64, DossierError> {
        cosine_similarity(a, b)
    }

    /// Return the dimensionality of vectors produced by this service.
    fn dimensions(&self) -> usize;
}

impl<T: EmbeddingService + ?Sized> EmbeddingService for Arc<T> {
    fn encode(&self, text: &str) -> Result<Vec<f32>, DossierError> {
        (**self).encode(text)
    }

    fn similarity(&self, a: &[f32], b: &[f32]) -> Result<f64, DossierError> {
        (**self).similarity(a, b)
    }

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }
}

/// Cosine similarity of two equal-length vectors.
///
/// Zero vectors have similarity 0.0. Mismatched lengths are an error.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, DossierError> {
    if a.len() != b.len() {
        return Err(DossierError::Embedding(format!(
            "Dimension mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

/// Mock embedding service producing deterministic hashed bag-of-words vectors.
///
/// Every lowercase alphanumeric token is hashed into one of `dimensions`
/// buckets with a hash-derived sign, and the result is L2-normalized. Identical
/// inputs always produce identical outputs, and texts that share vocabulary
/// have a higher cosine similarity than texts that do not, which is enough to
/// exercise the ranking pipeline without a real model.
#[derive(Debug, Clone)]
pub struct MockEmbedding {
    dimensions: usize,
}

impl Default for MockEmbedding {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbedding {
    pub fn new() -> Self {
        Self { dimensions: 384 }
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn hash_to_vector(&self, text: &str) -> Vec<f32> {
        let mut result = vec![0.0f32; self.dimensions];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.to_lowercase().hash(&mut hasher);
            let h = hasher.finish();
            let bucket = (h % self.dimensions as u64) as usize;
            let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
            result[bucket] += sign;
        }

        let norm: f32 = result.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for val in &mut result {
                *val /= norm;
            }
        }

        result
    }
}

impl EmbeddingService for MockEmbedding {
    fn encode(&self, text: &str) -> Result<Vec<f32>, DossierError> {
        if text.trim().is_empty() {
            return Err(DossierError::Embedding("Cannot embed empty text".to_string()));
        }
        Ok(self.hash_to_vector(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
