//! Per-query relevance ranking with persona-aware score fusion.
//!
//! Each section is scored against one query through the embedding service.
//! Failures in a sub-step are contained to that section: the enhanced query
//! falls back to the base query vector, a failed title scores zero, and a
//! section whose content cannot be encoded is skipped.

use std::collections::HashSet;

use tracing::{debug, warn};

use dossier_core::config::{KeywordConfig, RankingConfig};
use dossier_core::keywords::{self, contains_any, PERSONA_SEPARATOR, TRAVEL_PLANNER_PERSONA};
use dossier_core::types::{ScoredSection, Section};
use dossier_vector::EmbeddingService;

const GROUP_BOOST: f64 = 1.3;
const DAY_BOOST: f64 = 1.2;
const PERSONA_KEYWORD_WEIGHT: f64 = 0.5;

/// Keyword lists and limits for the ranker.
#[derive(Debug, Clone)]
pub struct RankerConfig {
    /// Distinct documents kept per query.
    pub per_query_limit: usize,
    pub travel_keywords: Vec<String>,
    pub group_markers: Vec<String>,
    pub day_markers: Vec<String>,
    pub planning_cues: Vec<String>,
    pub dining_cues: Vec<String>,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            per_query_limit: 5,
            travel_keywords: keywords::owned(keywords::TRAVEL_KEYWORDS),
            group_markers: keywords::owned(keywords::GROUP_MARKERS),
            day_markers: keywords::owned(keywords::DAY_MARKERS),
            planning_cues: keywords::owned(keywords::PLANNING_CUES),
            dining_cues: keywords::owned(keywords::DINING_CUES),
        }
    }
}

impl RankerConfig {
    pub fn from_config(keywords: &KeywordConfig, ranking: &RankingConfig) -> Self {
        Self {
            per_query_limit: ranking.per_query_limit,
            travel_keywords: keywords::lowercased(&keywords.travel_keywords),
            group_markers: keywords::lowercased(&keywords.group_markers),
            day_markers: keywords::lowercased(&keywords.day_markers),
            planning_cues: keywords::lowercased(&keywords.planning_cues),
            dining_cues: keywords::lowercased(&keywords.dining_cues),
        }
    }
}

/// Why a section dropped out of a query's ranking.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    EmptyContent,
    ContentEncoding(String),
    NonFiniteScore,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::EmptyContent => write!(f, "empty content"),
            SkipReason::ContentEncoding(e) => write!(f, "content encoding failed: {}", e),
            SkipReason::NonFiniteScore => write!(f, "non-finite score"),
        }
    }
}

/// Result of scoring one section against one query.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionOutcome {
    Scored(ScoredSection),
    Skipped(SkipReason),
}

/// The four embedding-derived signals fused into a section score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreComponents {
    pub content: f64,
    pub enhanced: f64,
    pub title: f64,
    pub persona_relevance: f64,
}

/// Lowercased text before "needs to", or "" when the phrase is absent.
pub fn persona_type(query: &str) -> String {
    let lower = query.to_lowercase();
    match lower.split_once(PERSONA_SEPARATOR) {
        Some((persona, _)) => persona.trim().to_string(),
        None => String::new(),
    }
}

fn is_travel_planner(persona_type: &str) -> bool {
    persona_type.contains(TRAVEL_PLANNER_PERSONA)
}

/// Reformulate `query` around a section title.
pub fn enhanced_query(query: &str, title: &str, persona_type: &str, config: &RankerConfig) -> String {
    if is_travel_planner(persona_type) {
        let query_lower = query.to_lowercase();
        if contains_any(&query_lower, &config.planning_cues) {
            return format!("travel planning guide for {} with group activities", title);
        }
        if contains_any(&query_lower, &config.dining_cues) {
            return format!("best group dining options in {}", title);
        }
    }
    format!("{} related to {}", query, title)
}

/// 1.0 plus half the fraction of persona keywords present in the content.
pub fn persona_relevance<S: AsRef<str>>(content_lower: &str, keywords: &[S]) -> f64 {
    if keywords.is_empty() {
        return 1.0;
    }
    let matches = keywords
        .iter()
        .filter(|k| content_lower.contains(k.as_ref()))
        .count();
    1.0 + (matches as f64 / keywords.len() as f64) * PERSONA_KEYWORD_WEIGHT
}

/// Fuse the score components into one value.
///
/// Non-travel personas use the content similarity alone.
pub fn fuse_scores(
    components: &ScoreComponents,
    content_lower: &str,
    travel_persona: bool,
    config: &RankerConfig,
) -> f64 {
    if !travel_persona {
        return components.content;
    }

    let base = components.content * 0.3
        + components.enhanced * 0.3
        + components.title * 0.2
        + components.persona_relevance * 0.2;

    let group = if contains_any(content_lower, &config.group_markers) {
        GROUP_BOOST
    } else {
        1.0
    };
    let days = if contains_any(content_lower, &config.day_markers) {
        DAY_BOOST
    } else {
        1.0
    };

    base * group * days
}

fn similarity_or_zero(embedder: &dyn EmbeddingService, a: &[f32], b: &[f32]) -> f64 {
    embedder.similarity(a, b).unwrap_or_else(|e| {
        debug!(error = %e, "Similarity failed, scoring 0.0");
        0.0
    })
}

/// Score one section against a query whose vector is already known.
pub fn score_section(
    embedder: &dyn EmbeddingService,
    query: &str,
    query_vector: &[f32],
    persona: &str,
    section: &Section,
    config: &RankerConfig,
) -> SectionOutcome {
    let content = section.refined_text.trim();
    if content.is_empty() {
        return SectionOutcome::Skipped(SkipReason::EmptyContent);
    }
    let title = section.section_title.trim();

    let content_vector = match embedder.encode(content) {
        Ok(v) => v,
        Err(e) => return SectionOutcome::Skipped(SkipReason::ContentEncoding(e.to_string())),
    };

    let enhanced = enhanced_query(query, title, persona, config);
    let enhanced_vector = match embedder.encode(&enhanced) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!(document = %section.document, error = %e, "Enhanced query encoding failed, using base query");
            None
        }
    };
    let enhanced_vector = enhanced_vector.as_deref().unwrap_or(query_vector);

    let title_score = if title.is_empty() {
        0.0
    } else {
        match embedder.encode(title) {
            Ok(v) => similarity_or_zero(embedder, query_vector, &v),
            Err(e) => {
                debug!(document = %section.document, error = %e, "Title encoding failed, title score 0");
                0.0
            }
        }
    };

    let content_lower = content.to_lowercase();
    let travel = is_travel_planner(persona);
    let components = ScoreComponents {
        content: similarity_or_zero(embedder, query_vector, &content_vector),
        enhanced: similarity_or_zero(embedder, enhanced_vector, &content_vector),
        title: title_score,
        persona_relevance: if travel {
            persona_relevance(&content_lower, &config.travel_keywords)
        } else {
            1.0
        },
    };

    let score = fuse_scores(&components, &content_lower, travel, config);
    if !score.is_finite() {
        return SectionOutcome::Skipped(SkipReason::NonFiniteScore);
    }

    SectionOutcome::Scored(ScoredSection {
        section: Section {
            document: section.document.clone(),
            page: section.page,
            section_title: title.to_string(),
            refined_text: content.to_string(),
        },
        similarity_score: score,
    })
}

/// Rank the pool against one query.
///
/// Returns at most `per_query_limit` sections, one per document, by
/// descending score. Equal scores keep pool order.
pub fn rank_sections(
    query: &str,
    sections: &[Section],
    embedder: &dyn EmbeddingService,
    config: &RankerConfig,
) -> Vec<ScoredSection> {
    if sections.is_empty() {
        return Vec::new();
    }

    let query_vector = match embedder.encode(query) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Query encoding failed, query contributes nothing");
            return Vec::new();
        }
    };
    let persona = persona_type(query);

    let mut scored: Vec<ScoredSection> = Vec::with_capacity(sections.len());
    for section in sections {
        match score_section(embedder, query, &query_vector, &persona, section, config) {
            SectionOutcome::Scored(s) => scored.push(s),
            SectionOutcome::Skipped(reason) => {
                debug!(document = %section.document, page = section.page, %reason, "Section skipped");
            }
        }
    }

    scored.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));

    let mut seen = HashSet::new();
    let mut ranked = Vec::new();
    for s in scored {
        if ranked.len() >= config.per_query_limit {
            break;
        }
        if seen.insert(s.section.document.clone()) {
            ranked.push(s);
        }
    }
    ranked
}
