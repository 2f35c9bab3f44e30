//! End-to-end insight generation: extract, segment, rank, select.

use std::sync::Arc;

use tracing::{info, info_span};
use uuid::Uuid;

use dossier_core::config::DossierConfig;
use dossier_core::types::{processing_timestamp, InsightReport, ReportMetadata, Section, UploadedDocument};
use dossier_extract::DocumentExtractor;
use dossier_vector::{EmbeddingCache, EmbeddingService};

use crate::normalize::Normalizer;
use crate::query::{aggregate, expand_queries};
use crate::ranker::RankerConfig;
use crate::segmenter::{extract_sections, SegmenterConfig};
use crate::selector::{select_diverse, Selection, SelectorConfig};

/// Runs the whole pipeline for one request.
///
/// The engine holds no per-request state; every call to [`generate`](Self::generate)
/// owns its section pool and score maps. The embedding service is shared and
/// reused across calls.
pub struct InsightEngine {
    embedder: Arc<dyn EmbeddingService>,
    extractor: Arc<dyn DocumentExtractor>,
    segmenter: SegmenterConfig,
    ranker: RankerConfig,
    normalizer: Normalizer,
    selector: SelectorConfig,
    query_weight_step: f64,
}

impl InsightEngine {
    pub fn new(
        embedder: Arc<dyn EmbeddingService>,
        extractor: Arc<dyn DocumentExtractor>,
        config: &DossierConfig,
    ) -> Self {
        Self {
            embedder,
            extractor,
            segmenter: SegmenterConfig::from_config(&config.keywords, &config.ranking),
            ranker: RankerConfig::from_config(&config.keywords, &config.ranking),
            normalizer: Normalizer::from_config(&config.keywords, &config.ranking),
            selector: SelectorConfig::from(&config.ranking),
            query_weight_step: config.ranking.query_weight_step,
        }
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingService> {
        &self.embedder
    }

    /// Produce the insight report for a set of uploaded documents.
    pub fn generate(&self, documents: &[UploadedDocument], persona: &str, job: &str) -> InsightReport {
        let span = info_span!("generate_insights", run_id = %Uuid::new_v4());
        let _guard = span.enter();

        let corpus = extract_sections(documents, self.extractor.as_ref(), &self.segmenter);
        info!(
            documents = corpus.document_names.len(),
            sections = corpus.sections.len(),
            "Documents segmented"
        );

        let selection = self.rank_corpus(&corpus.sections, persona, job);
        info!(selected = selection.len(), "Insights generated");

        InsightReport {
            metadata: ReportMetadata {
                input_documents: corpus.document_names,
                persona: persona.to_string(),
                job_to_be_done: job.to_string(),
                processing_timestamp: processing_timestamp(),
            },
            extracted_sections: selection.ranked,
            subsection_analysis: selection.excerpts,
        }
    }

    /// Rank an already-segmented pool and select the digest.
    pub fn rank_corpus(&self, sections: &[Section], persona: &str, job: &str) -> Selection {
        let cache = EmbeddingCache::new(self.embedder.as_ref());
        let queries = expand_queries(persona, job);
        let pool = aggregate(&queries, sections, &cache, &self.ranker, self.query_weight_step);
        info!(
            queries = queries.len(),
            candidates = pool.len(),
            encoded = cache.len(),
            "Queries aggregated"
        );
        select_diverse(&pool, &self.normalizer, &self.selector)
    }
}
