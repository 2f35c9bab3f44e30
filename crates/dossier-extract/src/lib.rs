//! Dossier Extract crate - raw page/block/TOC extraction from uploaded documents.
//!
//! The insight engine only sees [`RawDocument`]s; how they are produced is
//! behind the [`DocumentExtractor`] trait so tests can build documents by hand.

pub mod auto;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod plain_text;
pub mod types;

pub use auto::AutoExtractor;
#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;
pub use plain_text::PlainTextExtractor;
pub use types::{BlockBounds, RawDocument, RawPage, TextBlock, TocEntry};

use dossier_core::error::DossierError;

/// Turns a document byte stream into ordered pages of text blocks plus an
/// optional table of contents.
pub trait DocumentExtractor: Send + Sync {
    /// Parse `bytes`. An error means the document is unreadable and should be skipped.
    fn extract(&self, bytes: &[u8]) -> Result<RawDocument, DossierError>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Split page text into blocks on blank lines, dropping empty blocks.
pub(crate) fn split_blocks(page_text: &str) -> Vec<TextBlock> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in page_text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(TextBlock::new(current.join("\n")));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(TextBlock::new(current.join("\n")));
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_blocks_on_blank_lines() {
        let blocks = split_blocks("First line\nsecond line\n\n\nThird block\n  \nFourth");
        let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["First line\nsecond line", "Third block", "Fourth"]);
    }

    #[test]
    fn test_single_line_breaks_stay_in_one_block() {
        let blocks = split_blocks(
            "Lyon Food Guide\nBouchons serve local dishes.\nMarkets open early.\nBoats leave hourly.",
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].text.lines().count(), 4);
    }

    #[test]
    fn test_split_blocks_empty_page() {
        assert!(split_blocks("").is_empty());
        assert!(split_blocks("\n \n").is_empty());
    }
}
