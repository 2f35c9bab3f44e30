//! Query expansion and weighted aggregation across reformulated queries.

use tracing::debug;

use dossier_core::types::{ScoredSection, Section};
use dossier_vector::EmbeddingService;

use crate::ranker::{rank_sections, RankerConfig};

/// Build the four ranking queries for a persona and job, most general first.
pub fn expand_queries(persona: &str, job: &str) -> Vec<String> {
    let job = job.trim();
    let base = format!("{} needs to {}", persona.trim(), job);
    let with_group = format!("{} with group activities", base);
    vec![
        base,
        with_group,
        format!("Travel guide for {}", job),
        format!("Group itinerary for {}", job.replace("plan a trip", "")),
    ]
}

/// Score multiplier for the query at `index`: later queries count more.
pub fn query_weight(index: usize, step: f64) -> f64 {
    1.0 + index as f64 * step
}

/// Rank the pool once per query and concatenate the weighted results.
///
/// Each query keeps its own per-query cap before weighting. The combined
/// pool is returned in query order, unsorted.
pub fn aggregate(
    queries: &[String],
    sections: &[Section],
    embedder: &dyn EmbeddingService,
    config: &RankerConfig,
    weight_step: f64,
) -> Vec<ScoredSection> {
    let mut pool = Vec::new();

    for (index, query) in queries.iter().enumerate() {
        let weight = query_weight(index, weight_step);
        let ranked = rank_sections(query, sections, embedder, config);
        debug!(query_index = index, weight, results = ranked.len(), "Query ranked");

        pool.extend(ranked.into_iter().map(|mut s| {
            s.similarity_score *= weight;
            s
        }));
    }

    pool
}
