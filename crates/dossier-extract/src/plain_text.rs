//! Plain-text extraction: form feeds separate pages, blank lines separate blocks.

use dossier_core::error::DossierError;

use crate::types::{RawDocument, RawPage};
use crate::{split_blocks, DocumentExtractor};

/// Extractor for UTF-8 text documents. Plain text has no TOC.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<RawDocument, DossierError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| DossierError::Extraction(format!("Document is not UTF-8 text: {}", e)))?;

        let pages = text
            .split('\x0c')
            .enumerate()
            .map(|(idx, page_text)| RawPage {
                number: idx as u32 + 1,
                blocks: split_blocks(page_text),
            })
            .collect();

        Ok(RawDocument {
            pages,
            toc: Vec::new(),
        })
    }

    fn name(&self) -> &'static str {
        "plain-text"
    }
}
