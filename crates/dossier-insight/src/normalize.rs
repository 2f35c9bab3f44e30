//! Title and excerpt normalization.

use std::sync::LazyLock;

use regex::Regex;

use dossier_core::config::{KeywordConfig, RankingConfig};
use dossier_core::keywords::{self, contains_any};

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Leading bullets, dashes and outline numerals ("•", "-", "3.", "1.2.").
pub(crate) static LEADING_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[•\-\d.]+\s*").unwrap());

static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\d\W]+$").unwrap());

/// Minimum title length, in characters.
pub const MIN_TITLE_CHARS: usize = 8;
/// Minimum sentence length kept in an excerpt, in characters.
pub const MIN_SENTENCE_CHARS: usize = 30;
/// Minimum number of space characters in a kept sentence (at least four words).
pub const MIN_SENTENCE_SPACES: usize = 3;

/// Collapse whitespace runs to one space.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").into_owned()
}

/// Keep only the part before the first ':' when that part is long enough to stand alone.
pub(crate) fn truncate_at_colon(title: &str) -> &str {
    match title.split_once(':') {
        Some((head, _)) if head.trim().chars().count() >= MIN_TITLE_CHARS => head.trim(),
        _ => title,
    }
}

/// Normalize a section title for output.
///
/// Whitespace is collapsed before the leading marker is stripped, without
/// trimming first, so a title that starts with a space keeps its marker.
pub fn clean_section_title(title: &str) -> String {
    if title.is_empty() {
        return String::new();
    }

    let collapsed = collapse_whitespace(title);
    let stripped = LEADING_MARKER_RE.replace(&collapsed, "");
    truncate_at_colon(&stripped).trim().to_string()
}

/// Split on `.`, `!` or `?` followed by whitespace. The whitespace run is dropped.
pub(crate) fn split_sentences(text: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let end = i + c.len_utf8();
        let mut next_start = end;
        while let Some(&(j, w)) = chars.peek() {
            if !w.is_whitespace() {
                break;
            }
            next_start = j + w.len_utf8();
            chars.next();
        }
        if next_start > end {
            result.push(&text[start..end]);
            start = next_start;
        }
    }
    result.push(&text[start..]);
    result
}

/// Title validation and excerpt refinement, parameterised by keyword lists.
#[derive(Debug, Clone)]
pub struct Normalizer {
    invalid_title_terms: Vec<String>,
    boilerplate_markers: Vec<String>,
    max_sentences: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            invalid_title_terms: keywords::owned(keywords::INVALID_TITLE_TERMS),
            boilerplate_markers: keywords::owned(keywords::BOILERPLATE_MARKERS),
            max_sentences: 4,
        }
    }
}

impl Normalizer {
    pub fn from_config(keywords: &KeywordConfig, ranking: &RankingConfig) -> Self {
        Self {
            invalid_title_terms: keywords::lowercased(&keywords.invalid_title_terms),
            boilerplate_markers: keywords::lowercased(&keywords.boilerplate_markers),
            max_sentences: ranking.max_excerpt_sentences,
        }
    }

    /// A title is valid when it is at least 8 characters, contains a letter,
    /// and mentions none of the generic placeholder terms.
    pub fn is_valid_title(&self, title: &str) -> bool {
        let title = title.trim();
        if title.chars().count() < MIN_TITLE_CHARS {
            return false;
        }
        if NON_WORD_RE.is_match(title) {
            return false;
        }
        !contains_any(&title.to_lowercase(), &self.invalid_title_terms)
    }

    /// True when the lowercased text contains a boilerplate marker.
    pub fn is_boilerplate(&self, text: &str) -> bool {
        contains_any(&text.to_lowercase(), &self.boilerplate_markers)
    }

    /// Keep the first few substantive sentences of `text`.
    ///
    /// A sentence survives when it is at least 30 characters, has at least
    /// three spaces, and carries no boilerplate. Returns "" when none survive.
    pub fn process_section_text(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        split_sentences(text)
            .into_iter()
            .map(str::trim)
            .filter(|sent| {
                sent.chars().count() >= MIN_SENTENCE_CHARS
                    && sent.matches(' ').count() >= MIN_SENTENCE_SPACES
                    && !self.is_boilerplate(sent)
            })
            .take(self.max_sentences)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
