//! Dossier Insight crate - persona-driven section ranking over uploaded documents.
//!
//! The pipeline, leaves first:
//! - Segmentation of raw pages into titled sections (heading cues + TOC hints)
//! - Title and excerpt normalization
//! - Per-query relevance ranking with persona-aware score fusion
//! - Query expansion and weighted aggregation across reformulated queries
//! - Diversity selection: best section per document, top-K digest

pub mod engine;
pub mod normalize;
pub mod query;
pub mod ranker;
pub mod segmenter;
pub mod selector;

pub use engine::InsightEngine;
pub use normalize::{clean_section_title, Normalizer};
pub use query::{aggregate, expand_queries, query_weight};
pub use ranker::{
    rank_sections, score_section, RankerConfig, ScoreComponents, SectionOutcome, SkipReason,
};
pub use segmenter::{extract_sections, segment_document, ExtractedCorpus, SegmenterConfig};
pub use selector::{select_diverse, DocumentBestSection, Selection, SelectorConfig};
