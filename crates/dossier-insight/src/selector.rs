//! Diversity selection: one best section per document, top-K overall.

use std::collections::HashMap;

use tracing::debug;

use dossier_core::config::RankingConfig;
use dossier_core::types::{ExcerptResult, RankedResult, ScoredSection, Section};

use crate::normalize::{clean_section_title, Normalizer};

#[derive(Debug, Clone, Copy)]
pub struct SelectorConfig {
    pub top_k: usize,
    /// Processed excerpts shorter than this (in characters) are discarded.
    pub min_excerpt_chars: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            min_excerpt_chars: 100,
        }
    }
}

impl From<&RankingConfig> for SelectorConfig {
    fn from(ranking: &RankingConfig) -> Self {
        Self {
            top_k: ranking.top_k,
            min_excerpt_chars: ranking.min_excerpt_chars,
        }
    }
}

/// The highest-scoring valid section seen for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentBestSection {
    pub document: String,
    /// Cleaned title.
    pub section_title: String,
    pub page: u32,
    pub score: f64,
    /// Processed excerpt.
    pub refined_text: String,
}

impl DocumentBestSection {
    /// Back to a scored section carrying the cleaned title and processed text.
    pub fn to_scored(&self) -> ScoredSection {
        ScoredSection {
            section: Section {
                document: self.document.clone(),
                page: self.page,
                section_title: self.section_title.clone(),
                refined_text: self.refined_text.clone(),
            },
            similarity_score: self.score,
        }
    }
}

/// Final digest: parallel ranked and excerpt lists, plus the winners they came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub ranked: Vec<RankedResult>,
    pub excerpts: Vec<ExcerptResult>,
    pub best: Vec<DocumentBestSection>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Reduce the aggregated pool to at most `top_k` sections, one per document.
///
/// A section replaces the stored one for its document only with a strictly
/// higher score. Documents are ordered by descending score; ties keep the
/// order in which documents were first seen.
pub fn select_diverse(
    pool: &[ScoredSection],
    normalizer: &Normalizer,
    config: &SelectorConfig,
) -> Selection {
    let mut best: Vec<DocumentBestSection> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for candidate in pool {
        let section = &candidate.section;

        let title = clean_section_title(&section.section_title);
        if !normalizer.is_valid_title(&title) {
            debug!(document = %section.document, title = %section.section_title, "Rejected invalid title");
            continue;
        }

        let excerpt = normalizer.process_section_text(&section.refined_text);
        if excerpt.chars().count() < config.min_excerpt_chars {
            debug!(document = %section.document, chars = excerpt.chars().count(), "Rejected short excerpt");
            continue;
        }

        let entry = DocumentBestSection {
            document: section.document.clone(),
            section_title: title,
            page: section.page,
            score: candidate.similarity_score,
            refined_text: excerpt,
        };

        match index.get(&section.document) {
            Some(&slot) => {
                if entry.score > best[slot].score {
                    best[slot] = entry;
                }
            }
            None => {
                index.insert(section.document.clone(), best.len());
                best.push(entry);
            }
        }
    }

    best.sort_by(|a, b| b.score.total_cmp(&a.score));
    best.truncate(config.top_k);

    let ranked = best
        .iter()
        .enumerate()
        .map(|(i, b)| RankedResult {
            document: b.document.clone(),
            section_title: b.section_title.clone(),
            importance_rank: i as u32 + 1,
            page_number: b.page,
        })
        .collect();
    let excerpts = best
        .iter()
        .map(|b| ExcerptResult {
            document: b.document.clone(),
            page_number: b.page,
            refined_text: b.refined_text.clone(),
        })
        .collect();

    Selection {
        ranked,
        excerpts,
        best,
    }
}
