//! Keyword lists that drive segmentation, normalization and persona scoring.
//!
//! These are the built-in defaults; `KeywordConfig` in [`crate::config`]
//! starts from them and can override any list from the TOML file.
//! All matching is case-insensitive substring matching against lowercased text.

/// Words whose presence in a short block marks it as a heading candidate.
pub static HEADING_CUES: &[&str] = &["guide", "overview", "introduction"];

/// Markers of legal boilerplate. Blocks and sentences containing them are dropped.
pub static BOILERPLATE_MARKERS: &[&str] = &["copyright", "all rights reserved"];

/// Substrings that disqualify a section title.
pub static INVALID_TITLE_TERMS: &[&str] = &["page", "section", "chapter", "untitled", "contents"];

/// Content keywords counted by the travel-planner persona relevance score.
pub static TRAVEL_KEYWORDS: &[&str] = &[
    "group",
    "itinerary",
    "schedule",
    "activities",
    "accommodation",
    "transportation",
    "budget",
    "booking",
    "reservation",
];

/// Content markers that earn the group boost.
pub static GROUP_MARKERS: &[&str] = &["group", "friends", "together"];

/// Content markers that earn the day-planning boost.
pub static DAY_MARKERS: &[&str] = &["day", "itinerary", "schedule"];

/// Query cues that select the planning flavour of the enhanced query.
pub static PLANNING_CUES: &[&str] = &["itinerary", "plan"];

/// Query cues that select the dining flavour of the enhanced query.
pub static DINING_CUES: &[&str] = &["restaurant", "dining"];

/// Persona marker (lowercase) that switches on travel-specific fusion.
pub const TRAVEL_PLANNER_PERSONA: &str = "travel planner";

/// Phrase separating the persona from the task inside a query.
pub const PERSONA_SEPARATOR: &str = "needs to";

/// Convert a static keyword list into owned strings.
pub fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Lowercase a configured keyword list so it matches lowercased text.
pub fn lowercased<S: AsRef<str>>(list: &[S]) -> Vec<String> {
    list.iter().map(|s| s.as_ref().to_lowercase()).collect()
}

/// True when `haystack_lower` contains any of the (lowercase) needles.
pub fn contains_any<S: AsRef<str>>(haystack_lower: &str, needles: &[S]) -> bool {
    needles.iter().any(|n| haystack_lower.contains(n.as_ref()))
}
