//! PDF extraction via lopdf.
//!
//! lopdf yields page text without layout, so blocks are recovered by
//! splitting each page's text on blank lines. Block geometry is not available
//! from this backend and is left empty.
//!
//! lopdf ends each text object with a single line break and rarely emits a
//! blank line, so a typical page arrives as one multi-line block. Such a
//! block has more than three lines and is never taken as a heading, which
//! leaves the outline (when present) and the "Page N" fallback as the main
//! sources of section titles for PDFs. Plain-text uploads keep paragraph
//! blocks and get full heading detection.

use dossier_core::error::DossierError;
use lopdf::Document;
use tracing::debug;

use crate::types::{RawDocument, RawPage, TocEntry};
use crate::{split_blocks, DocumentExtractor};

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<RawDocument, DossierError> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| DossierError::Extraction(format!("Failed to open PDF: {}", e)))?;

        let mut pages = Vec::new();
        for (&number, _) in doc.get_pages().iter() {
            let blocks = match doc.extract_text(&[number]) {
                Ok(text) => split_blocks(&text),
                Err(e) => {
                    debug!(page = number, error = %e, "No text extracted from page");
                    Vec::new()
                }
            };
            pages.push(RawPage { number, blocks });
        }

        // An unreadable outline degrades to "no TOC" rather than failing the document.
        let toc = match doc.get_toc() {
            Ok(toc) => toc
                .toc
                .into_iter()
                .map(|entry| TocEntry {
                    level: entry.level as u32,
                    title: entry.title,
                    page: entry.page as u32,
                })
                .collect(),
            Err(e) => {
                debug!(error = %e, "PDF outline unavailable");
                Vec::new()
            }
        };

        Ok(RawDocument { pages, toc })
    }

    fn name(&self) -> &'static str {
        "pdf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_fail_to_open() {
        let result = PdfExtractor::new().extract(b"%PDF-1.4 this is not really a pdf");
        assert!(matches!(result, Err(DossierError::Extraction(_))));
    }

    #[test]
    fn test_empty_input_fails_to_open() {
        assert!(PdfExtractor::new().extract(b"").is_err());
    }
}
