//! Heuristic segmentation of raw pages into titled sections.
//!
//! Section boundaries come from two places: pages that the document's TOC
//! names, and short blocks that read like headings (few lines, a heading cue
//! word such as "guide" or "overview"). Everything else on the page is body
//! text for the section currently open.

use std::cmp::Reverse;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use dossier_core::config::{KeywordConfig, RankingConfig};
use dossier_core::keywords::{self, contains_any};
use dossier_core::types::{Section, UploadedDocument};
use dossier_extract::{DocumentExtractor, RawDocument};

use crate::normalize::{collapse_whitespace, truncate_at_colon, LEADING_MARKER_RE};

static TRAILING_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;:\-]*$").unwrap());

/// Heading blocks have at most this many non-blank lines.
pub const MAX_HEADING_LINES: usize = 3;
/// Every line of a heading block is at most this long.
pub const MAX_HEADING_LINE_CHARS: usize = 100;
/// Title candidates are between these lengths (inclusive).
pub const TITLE_CANDIDATE_CHARS: (usize, usize) = (8, 80);

#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    pub min_block_chars: usize,
    pub heading_cues: Vec<String>,
    pub boilerplate_markers: Vec<String>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_block_chars: 50,
            heading_cues: keywords::owned(keywords::HEADING_CUES),
            boilerplate_markers: keywords::owned(keywords::BOILERPLATE_MARKERS),
        }
    }
}

impl SegmenterConfig {
    pub fn from_config(keywords: &KeywordConfig, ranking: &RankingConfig) -> Self {
        Self {
            min_block_chars: ranking.min_block_chars,
            heading_cues: keywords::lowercased(&keywords.heading_cues),
            boilerplate_markers: keywords::lowercased(&keywords.boilerplate_markers),
        }
    }
}

/// Sections of every readable document, plus the names of all documents
/// (readable or not) in upload order.
#[derive(Debug, Clone, Default)]
pub struct ExtractedCorpus {
    pub sections: Vec<Section>,
    pub document_names: Vec<String>,
}

/// Clean a heading or TOC title: collapse whitespace, strip leading markers,
/// cut at a colon when the prefix stands alone, drop trailing punctuation.
pub fn clean_heading(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    let stripped = LEADING_MARKER_RE.replace(collapsed.trim(), "");
    let head = truncate_at_colon(&stripped);
    TRAILING_PUNCT_RE.replace(head, "").trim().to_string()
}

/// Pick the most title-like line, cleaned. Returns "" when no line qualifies.
///
/// Lines of 8-80 characters score one point each for a leading capital, any
/// capitalised word, and not ending in a period. Highest score wins, shorter
/// line breaks ties, earlier line breaks remaining ties.
pub fn best_title<S: AsRef<str>>(lines: &[S]) -> String {
    let (min_chars, max_chars) = TITLE_CANDIDATE_CHARS;

    lines
        .iter()
        .map(|line| line.as_ref().trim())
        .filter(|line| (min_chars..=max_chars).contains(&line.chars().count()))
        .map(|line| {
            let mut score = 0u8;
            if line.chars().next().is_some_and(char::is_uppercase) {
                score += 1;
            }
            if line
                .split_whitespace()
                .any(|word| word.chars().next().is_some_and(char::is_uppercase))
            {
                score += 1;
            }
            if !line.ends_with('.') {
                score += 1;
            }
            (score, line)
        })
        .min_by_key(|(score, line)| (Reverse(*score), line.chars().count()))
        .map(|(_, line)| clean_heading(line))
        .unwrap_or_default()
}

/// A block reads like a heading when it is short, has few lines and
/// mentions a heading cue word.
pub fn looks_like_heading<S: AsRef<str>>(block: &str, lines: &[S], cues: &[String]) -> bool {
    lines.len() <= MAX_HEADING_LINES
        && lines
            .iter()
            .all(|l| l.as_ref().chars().count() <= MAX_HEADING_LINE_CHARS)
        && contains_any(&block.to_lowercase(), cues)
}

/// Accumulates body text under the current heading and emits sections.
struct SectionBuilder<'a> {
    document: &'a str,
    heading: Option<String>,
    text: String,
    sections: Vec<Section>,
}

impl<'a> SectionBuilder<'a> {
    fn new(document: &'a str) -> Self {
        Self {
            document,
            heading: None,
            text: String::new(),
            sections: Vec::new(),
        }
    }

    /// Emit the pending section, stamped with `page`, if it has text.
    fn flush(&mut self, page: u32) {
        if self.text.is_empty() {
            return;
        }
        let title = match self.heading.as_deref() {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => format!("Page {}", page),
        };
        self.sections.push(Section {
            document: self.document.to_string(),
            page,
            section_title: title,
            refined_text: std::mem::take(&mut self.text),
        });
    }

    /// Close the pending section and open a new one under `heading`.
    fn start(&mut self, heading: String, page: u32) {
        self.flush(page);
        self.heading = Some(heading);
        self.text.clear();
    }

    fn append(&mut self, block: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(block);
    }
}

/// Segment one extracted document into sections.
pub fn segment_document(name: &str, doc: &RawDocument, config: &SegmenterConfig) -> Vec<Section> {
    let toc = doc.toc_titles();
    let mut builder = SectionBuilder::new(name);
    let mut last_page = 0;

    for page in &doc.pages {
        last_page = page.number;

        if let Some(title) = toc.get(&page.number) {
            builder.start(clean_heading(title), page.number);
        }

        for block in &page.blocks {
            let text = block.text.trim();
            if text.chars().count() < config.min_block_chars {
                continue;
            }

            let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();
            if lines.is_empty() {
                continue;
            }

            if looks_like_heading(text, &lines, &config.heading_cues) {
                let heading = best_title(&lines);
                if !heading.is_empty() {
                    builder.start(heading, page.number);
                    continue;
                }
            }

            if !contains_any(&text.to_lowercase(), &config.boilerplate_markers) {
                builder.append(text);
            }
        }
    }

    builder.flush(last_page);
    builder.sections
}

/// Extract and segment every uploaded document.
///
/// A document that fails to extract is skipped with a warning; its name is
/// still recorded so it appears in the report metadata.
pub fn extract_sections(
    documents: &[UploadedDocument],
    extractor: &dyn DocumentExtractor,
    config: &SegmenterConfig,
) -> ExtractedCorpus {
    let mut corpus = ExtractedCorpus::default();

    for upload in documents {
        corpus.document_names.push(upload.name.clone());

        let raw = match extractor.extract(&upload.bytes) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(document = %upload.name, backend = extractor.name(), error = %e, "Skipping unreadable document");
                continue;
            }
        };

        let sections = segment_document(&upload.name, &raw, config);
        debug!(
            document = %upload.name,
            pages = raw.pages.len(),
            toc_entries = raw.toc.len(),
            sections = sections.len(),
            "Document segmented"
        );
        corpus.sections.extend(sections);
    }

    corpus
}
